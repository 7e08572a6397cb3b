use std::io::Write;

/// Hooks fired by the typing core after each scored keystroke
pub trait FeedbackHooks {
    fn on_correct(&mut self, _expected: char) {}
    fn on_incorrect(&mut self, _expected: char, _actual: char) {}
}

/// No feedback at all
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl FeedbackHooks for Silent {}

/// Rings the terminal bell on mistakes
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> FeedbackHooks for TerminalBell<W> {
    fn on_incorrect(&mut self, _expected: char, _actual: char) {
        // bell write errors are ignored
        let _ = self.out.write_all(b"\x07");
        let _ = self.out.flush();
    }
}
