use crate::plat::{Terminal, BEL, BOLD_OFF, BOLD_ON, BS, CR, DEL, ERASE, ESC, LF};

/// What the editor did with a keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// The line is still being typed.
    Editing,
    /// The operator pressed enter; [`LineEditor::line`] holds the command.
    Submit,
    /// The operator gave up on the line.
    Abort,
}

/// Collects a command line from single keypresses, echoing as it goes.
pub struct LineEditor {
    buf: Vec<u8>,
    capacity: usize,
    escape_keycode: u8,
}

impl LineEditor {
    /// Creates an editor holding at most `capacity - 1` bytes. `escape_keycode` aborts the line, as ESC does.
    pub fn new(capacity: usize, escape_keycode: u8) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
            escape_keycode,
        }
    }

    /// Starts a fresh line.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Handles one byte of input.
    pub fn key_in(&mut self, byte: u8, out: &mut dyn Terminal) -> Edit {
        match byte {
            DEL | BS => {
                if self.buf.pop().is_some() {
                    out.write_bytes(ERASE);
                }
                Edit::Editing
            }
            CR | LF => {
                out.write_bytes(b"\r\n");
                Edit::Submit
            }
            b if b == ESC || b == self.escape_keycode => {
                out.write_bytes(b"*abort*\r\n");
                Edit::Abort
            }
            0x20..=0xff => {
                if self.buf.len() < self.capacity.saturating_sub(1) {
                    self.buf.push(byte);
                    out.write_bytes(BOLD_ON);
                    out.write_byte(byte);
                    out.write_bytes(BOLD_OFF);
                } else {
                    out.write_byte(BEL);
                }
                Edit::Editing
            }
            _ => Edit::Editing,
        }
    }

    /// The line typed so far, one `char` per byte (Latin-1), so no input byte is lost.
    pub fn line(&self) -> String {
        self.buf.iter().map(|&b| char::from(b)).collect()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
