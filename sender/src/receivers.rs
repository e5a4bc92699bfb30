//! Receiver address list: loading and random selection.

use rand::Rng;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::SenderError;

/// Read newline-delimited receivers from `path`.
///
/// Lines are taken exactly as read, apart from a trailing `\r`. A trailing
/// newline therefore yields a trailing empty entry, which fails its own send
/// as invalid input. With `skip_blank` set, blank entries are dropped instead.
/// A missing file yields an empty list.
pub fn load_receivers(path: &Path, skip_blank: bool) -> Result<Vec<String>, SenderError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "receiver file not found");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(SenderError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    if content.is_empty() {
        return Ok(Vec::new());
    }

    let mut receivers: Vec<String> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();

    let blank = receivers.iter().filter(|r| r.trim().is_empty()).count();
    if blank > 0 {
        if skip_blank {
            receivers.retain(|r| !r.trim().is_empty());
            tracing::debug!(blank, "dropped blank receiver entries");
        } else {
            tracing::warn!(
                blank,
                path = %path.display(),
                "receiver file has blank entries; sends picking them will fail"
            );
        }
    }
    Ok(receivers)
}

/// Pick one receiver uniformly at random, with replacement.
pub fn pick_random<'a, R: Rng + ?Sized>(
    receivers: &'a [String],
    rng: &mut R,
) -> Result<&'a str, SenderError> {
    if receivers.is_empty() {
        return Err(SenderError::EmptyInput);
    }
    Ok(&receivers[rng.gen_range(0..receivers.len())])
}

/// The loaded receiver list, shared read-only by every send.
#[derive(Clone, Debug)]
pub struct ReceiverSource {
    receivers: Arc<[String]>,
}

impl ReceiverSource {
    /// Wrap an already loaded list. An empty list is [`SenderError::EmptyInput`].
    pub fn new(receivers: Vec<String>) -> Result<Self, SenderError> {
        if receivers.is_empty() {
            return Err(SenderError::EmptyInput);
        }
        Ok(Self {
            receivers: receivers.into(),
        })
    }

    /// Load from `path`; an empty or missing file is [`SenderError::NoReceivers`].
    pub fn from_file(path: &Path, skip_blank: bool) -> Result<Self, SenderError> {
        let receivers = load_receivers(path, skip_blank)?;
        if receivers.is_empty() {
            let shown = std::path::absolute(path).unwrap_or_else(|_| PathBuf::from(path));
            return Err(SenderError::NoReceivers(shown));
        }
        tracing::info!(count = receivers.len(), path = %path.display(), "loaded receivers");
        Self::new(receivers)
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.receivers
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&str, SenderError> {
        pick_random(&self.receivers, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::io::Write;

    fn file_with(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn lines_are_kept_in_order() {
        let file = file_with("one1a\none1b\none1c");
        let receivers = load_receivers(file.path(), false).unwrap();
        assert_eq!(receivers, vec!["one1a", "one1b", "one1c"]);
    }

    #[test]
    fn trailing_newline_keeps_empty_entry() {
        let file = file_with("one1a\none1b\n");
        let receivers = load_receivers(file.path(), false).unwrap();
        assert_eq!(receivers, vec!["one1a", "one1b", ""]);
    }

    #[test]
    fn skip_blank_drops_empty_entries() {
        let file = file_with("one1a\n\none1b\n");
        let receivers = load_receivers(file.path(), true).unwrap();
        assert_eq!(receivers, vec!["one1a", "one1b"]);
    }

    #[test]
    fn carriage_returns_are_stripped() {
        let file = file_with("one1a\r\none1b\r\n");
        let receivers = load_receivers(file.path(), true).unwrap();
        assert_eq!(receivers, vec!["one1a", "one1b"]);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let receivers = load_receivers(&dir.path().join("absent.txt"), false).unwrap();
        assert!(receivers.is_empty());
    }

    #[test]
    fn directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_receivers(dir.path(), false).unwrap_err();
        assert!(matches!(err, SenderError::Io { .. }));
    }

    #[test]
    fn empty_source_is_no_receivers() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReceiverSource::from_file(&dir.path().join("absent.txt"), false).unwrap_err();
        assert!(matches!(err, SenderError::NoReceivers(_)));

        let file = file_with("");
        let err = ReceiverSource::from_file(file.path(), false).unwrap_err();
        assert!(matches!(err, SenderError::NoReceivers(_)));
    }

    #[test]
    fn pick_from_one_returns_it() {
        let mut rng = StdRng::seed_from_u64(1);
        let receivers = vec!["one1only".to_string()];
        for _ in 0..10 {
            assert_eq!(pick_random(&receivers, &mut rng).unwrap(), "one1only");
        }
    }

    #[test]
    fn pick_from_none_is_empty_input() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            pick_random(&[], &mut rng),
            Err(SenderError::EmptyInput)
        ));
        assert!(matches!(
            ReceiverSource::new(vec![]),
            Err(SenderError::EmptyInput)
        ));
    }

    #[test]
    fn pick_covers_every_receiver() {
        let mut rng = StdRng::seed_from_u64(42);
        let source =
            ReceiverSource::new(vec!["one1a".into(), "one1b".into(), "one1c".into()]).unwrap();
        let seen: HashSet<&str> = (0..200).map(|_| source.pick(&mut rng).unwrap()).collect();
        assert_eq!(seen.len(), 3);
    }
}
