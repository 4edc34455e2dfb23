use log::warn;
use std::mem;

/// Longest line or accumulated event payload kept before the event is dropped.
pub const MAX_EVENT_BYTES: usize = 1 << 20;

/// Incremental decoder for `text/event-stream` bodies.
///
/// Chunks may split lines (and UTF-8 sequences) at any byte. Only the `data`
/// field is kept; `event`, `id`, `retry` and comment lines are dropped.
/// An event whose line or payload outgrows the limit is discarded up to the
/// next blank line.
#[derive(Debug)]
pub struct SseDecoder {
    line: Vec<u8>,
    data: String,
    has_data: bool,
    skip_lf: bool,
    skip_line: bool,
    discarding: bool,
    limit: usize,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_limit(MAX_EVENT_BYTES)
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            line: Vec::new(),
            data: String::new(),
            has_data: false,
            skip_lf: false,
            skip_line: false,
            discarding: false,
            limit: limit.max(1),
        }
    }

    /// Feeds one body chunk and returns the `data` payloads of every event it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut payloads = Vec::new();
        for &byte in chunk {
            if mem::take(&mut self.skip_lf) && byte == b'\n' {
                continue;
            }
            match byte {
                b'\n' | b'\r' => {
                    self.skip_lf = byte == b'\r';
                    if mem::take(&mut self.skip_line) {
                        continue;
                    }
                    let line = mem::take(&mut self.line);
                    if let Some(payload) = self.process_line(&line) {
                        payloads.push(payload);
                    }
                }
                _ if self.skip_line => {}
                _ => {
                    self.line.push(byte);
                    if self.line.len() > self.limit {
                        self.discard();
                        self.skip_line = true;
                    }
                }
            }
        }
        payloads
    }

    fn process_line(&mut self, line: &[u8]) -> Option<String> {
        if self.discarding {
            self.discarding = !line.is_empty();
            return None;
        }
        if line.is_empty() {
            return self.dispatch();
        }
        let line = String::from_utf8_lossy(line);
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.find(':') {
            Some(idx) => {
                let value = &line[idx + 1..];
                (&line[..idx], value.strip_prefix(' ').unwrap_or(value))
            }
            None => (&line[..], ""),
        };
        if field == "data" {
            if self.data.len() + value.len() + 1 > self.limit {
                self.discard();
                return None;
            }
            if self.has_data {
                self.data.push('\n');
            }
            self.data.push_str(value);
            self.has_data = true;
        }
        None
    }

    fn discard(&mut self) {
        warn!("dropping event larger than {} bytes", self.limit);
        self.discarding = true;
        self.line.clear();
        self.data.clear();
        self.has_data = false;
    }

    fn dispatch(&mut self) -> Option<String> {
        if !mem::take(&mut self.has_data) {
            return None;
        }
        Some(mem::take(&mut self.data))
    }
}
