//! Binary word2vec File Format
//!
//! Reader for the classic word2vec binary layout: an ASCII header line
//! `<vocab_size> <dimension>`, then one entry per word consisting of the
//! word bytes, a single space, and `dimension` little-endian f32s. Entries
//! may be separated by newlines, which are skipped.

use hashbrown::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{Error, Result};

/// A fully parsed embedding file.
#[derive(Debug)]
pub struct Word2VecFile {
    pub dimension: usize,
    pub vectors: HashMap<String, Vec<f32>>,
}

/// Read a word2vec binary file from disk.
pub fn read_file(path: &Path) -> Result<Word2VecFile> {
    let file = File::open(path)?;
    read_from(BufReader::new(file))
}

/// Read the word2vec binary layout from any buffered reader.
pub fn read_from<R: BufRead>(mut reader: R) -> Result<Word2VecFile> {
    let (vocab_size, dimension) = read_header(&mut reader)?;

    let mut vectors = HashMap::with_capacity(vocab_size);
    let mut raw = vec![0u8; dimension * 4];

    for _ in 0..vocab_size {
        let word = read_word(&mut reader)?;
        reader.read_exact(&mut raw).map_err(|_| {
            Error::DataIntegrity(format!("truncated vector payload for word {:?}", word))
        })?;

        let vector: Vec<f32> = raw
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        vectors.insert(word, vector);
    }

    Ok(Word2VecFile { dimension, vectors })
}

fn read_header<R: BufRead>(reader: &mut R) -> Result<(usize, usize)> {
    let mut header = String::new();
    reader.read_line(&mut header)?;

    let mut parts = header.split_whitespace();
    let vocab_size: usize = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::DataIntegrity(format!("malformed header line {:?}", header)))?;
    let dimension: usize = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::DataIntegrity(format!("malformed header line {:?}", header)))?;

    if dimension == 0 || parts.next().is_some() {
        return Err(Error::DataIntegrity(format!(
            "malformed header line {:?}",
            header
        )));
    }

    Ok((vocab_size, dimension))
}

/// Read one space-terminated word token, skipping entry-separator newlines.
fn read_word<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        if reader.read(&mut byte)? == 0 {
            return Err(Error::DataIntegrity(
                "unexpected end of file inside word token".to_string(),
            ));
        }
        match byte[0] {
            b'\n' | b'\r' if bytes.is_empty() => continue,
            b' ' => break,
            other => bytes.push(other),
        }
    }

    String::from_utf8(bytes)
        .map_err(|_| Error::DataIntegrity("word token is not valid UTF-8".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fixture(entries: &[(&str, &[f32])]) -> Vec<u8> {
        let dim = entries.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut buf = Vec::new();
        writeln!(buf, "{} {}", entries.len(), dim).unwrap();
        for (word, vector) in entries {
            buf.extend_from_slice(word.as_bytes());
            buf.push(b' ');
            for x in *vector {
                buf.extend_from_slice(&x.to_le_bytes());
            }
            buf.push(b'\n');
        }
        buf
    }

    #[test]
    fn test_read_roundtrip() {
        let data = fixture(&[("dog", &[1.0, 0.0, 0.5]), ("cat", &[0.9, 0.1, 0.4])]);
        let parsed = read_from(&data[..]).unwrap();

        assert_eq!(parsed.dimension, 3);
        assert_eq!(parsed.vectors.len(), 2);
        assert_eq!(parsed.vectors["dog"], vec![1.0, 0.0, 0.5]);
        assert_eq!(parsed.vectors["cat"], vec![0.9, 0.1, 0.4]);
    }

    #[test]
    fn test_read_from_file_on_disk() {
        let data = fixture(&[("dog", &[1.0, 2.0])]);
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&data).unwrap();

        let parsed = read_file(tmp.path()).unwrap();
        assert_eq!(parsed.dimension, 2);
        assert_eq!(parsed.vectors["dog"], vec![1.0, 2.0]);
    }

    #[test]
    fn test_truncated_payload() {
        let mut data = fixture(&[("dog", &[1.0, 0.0, 0.5])]);
        data.truncate(data.len() - 6);

        let err = read_from(&data[..]).unwrap_err();
        assert!(matches!(err, Error::DataIntegrity(_)));
    }

    #[test]
    fn test_bad_header() {
        let err = read_from(&b"not a header\n"[..]).unwrap_err();
        assert!(matches!(err, Error::DataIntegrity(_)));

        let err = read_from(&b"2 0\n"[..]).unwrap_err();
        assert!(matches!(err, Error::DataIntegrity(_)));
    }

    #[test]
    fn test_missing_entries() {
        // Header promises two words, body has one
        let mut data = fixture(&[("dog", &[1.0, 2.0])]);
        data[0] = b'2';

        let err = read_from(&data[..]).unwrap_err();
        assert!(matches!(err, Error::DataIntegrity(_)));
    }
}
