// camlink-rs/camlink/src/display.rs
//! Operator status output.
//!
//! Status lines are observational only; nothing in the protocol branches on
//! what was displayed.

use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use crate::Result;

/// Line-oriented operator display.
pub trait StatusDisplay {
    /// Blank the display.
    fn clear(&mut self) -> Result<()>;

    /// Show one line of text.
    fn write_line(&mut self, line: &str) -> Result<()>;
}

impl<D: StatusDisplay + ?Sized> StatusDisplay for &mut D {
    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        (**self).write_line(line)
    }
}

/// Lets one device act as both display and storage sink.
impl<D: StatusDisplay> StatusDisplay for Rc<RefCell<D>> {
    fn clear(&mut self) -> Result<()> {
        self.borrow_mut().clear()
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.borrow_mut().write_line(line)
    }
}

/// Sends status lines to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDisplay;

impl StatusDisplay for LogDisplay {
    fn clear(&mut self) -> Result<()> {
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        info!("display: {}", line.trim_end());
        Ok(())
    }
}

/// Keeps every line shown since the last clear, plus a full history.
#[derive(Debug, Default, Clone)]
pub struct RecordingDisplay {
    /// Lines since the last clear
    pub screen: Vec<String>,
    /// Every line ever written
    pub history: Vec<String>,
    /// Number of clears
    pub clears: usize,
}

impl RecordingDisplay {
    /// Empty display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent line on screen.
    pub fn last_line(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }
}

impl StatusDisplay for RecordingDisplay {
    fn clear(&mut self) -> Result<()> {
        self.screen.clear();
        self.clears += 1;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.screen.push(line.to_string());
        self.history.push(line.to_string());
        Ok(())
    }
}
