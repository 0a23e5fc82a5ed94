//! CSV text-file event log, one record per line after a fixed header.

use std::{
    fs::{self, File, OpenOptions},
    io::{ErrorKind, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use crate::event::{LOG_HEADER, ParkingEvent};

use super::{EventStore, StorageResult, warn_malformed};

/// File-backed implementation of [`crate::persist::EventStore`].
#[derive(Debug, Clone)]
pub struct CsvEventLog {
    path: PathBuf,
}

impl CsvEventLog {
    /// Opens the log at `path`, writing the header line if the file is missing or empty.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let log = Self {
            path: path.as_ref().to_path_buf(),
        };
        log.ensure_initialized()?;
        Ok(log)
    }

    /// Writes the header into a missing or zero-length file.
    fn ensure_initialized(&self) -> StorageResult<()> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => return Ok(()),
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format!("{LOG_HEADER}\n").as_bytes())?;
        file.sync_all()?;
        tracing::info!(path = %self.path.display(), "initialized event log");
        Ok(())
    }
}

impl EventStore for CsvEventLog {
    fn append(&mut self, event: &ParkingEvent) -> StorageResult<()> {
        self.ensure_initialized()?;

        let mut file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        let mut line = String::new();
        if ends_mid_line(&mut file)? {
            line.push('\n');
        }
        line.push_str(&event.to_line());
        line.push('\n');

        // One write per record so a crash leaves at most a torn final line.
        file.write_all(line.as_bytes())?;
        file.sync_data()?;
        Ok(())
    }

    fn read_all(&self) -> StorageResult<Vec<ParkingEvent>> {
        if !self.path.exists() {
            self.ensure_initialized()?;
            return Ok(Vec::new());
        }

        // Decoded per line so one corrupt byte only damages its own record.
        let bytes = fs::read(&self.path)?;
        let mut lines = bytes
            .split(|&b| b == b'\n')
            .map(String::from_utf8_lossy)
            .peekable();
        if lines
            .peek()
            .is_some_and(|first| first.trim_end_matches('\r') == LOG_HEADER)
        {
            lines.next();
        }
        let events: Vec<ParkingEvent> = lines
            .filter(|line| !line.trim().is_empty())
            .map(|line| ParkingEvent::from_line(&line))
            .collect();

        for (position, event) in events.iter().enumerate() {
            warn_malformed("csv", position, event);
        }
        tracing::debug!(path = %self.path.display(), count = events.len(), "read event log");
        Ok(events)
    }
}

fn ends_mid_line(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
