use std::{
    cell::RefCell,
    collections::VecDeque,
    io::{self, BufRead as _, Write as _},
    rc::Rc,
};

/// Host I/O seam for the interpreter.
///
/// The `print`/`println`/`input` builtins, the `assert` failure report, and
/// the module loader's diagnostics all go through this trait; nothing else in
/// the core touches the process streams. Implement it to capture or redirect
/// interpreter output — [`CollectIo`] does exactly that for tests.
pub trait HostIo {
    /// Writes one formatted value to standard output, without separators or a
    /// trailing newline; those are emitted via [`HostIo::stdout_push`].
    fn stdout_write(&mut self, text: &str);

    /// Writes a single separator or terminator character to standard output.
    fn stdout_push(&mut self, ch: char);

    /// Writes one diagnostic line to the host error sink.
    fn stderr_line(&mut self, line: &str);

    /// Reads one line from standard input. `None` means end of input.
    fn stdin_line(&mut self) -> Option<String>;
}

/// Default [`HostIo`] bound to the process streams.
#[derive(Debug, Default)]
pub struct StdIo;

impl HostIo for StdIo {
    fn stdout_write(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
    }

    fn stdout_push(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        let encoded = ch.encode_utf8(&mut buf);
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(encoded.as_bytes());
        if ch == '\n' {
            let _ = stdout.flush();
        }
    }

    fn stderr_line(&mut self, line: &str) {
        eprintln!("{line}");
    }

    fn stdin_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }
}

/// A [`HostIo`] that collects all output into shared buffers.
///
/// Clones share the same buffers, so a test can keep one handle and give the
/// interpreter another:
///
/// ```
/// use motif::{CollectIo, HostIo};
///
/// let io = CollectIo::default();
/// let mut handle: Box<dyn HostIo> = Box::new(io.clone());
/// handle.stdout_write("hi");
/// handle.stdout_push('\n');
/// assert_eq!(io.stdout(), "hi\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CollectIo {
    stdout: Rc<RefCell<String>>,
    stderr: Rc<RefCell<String>>,
    stdin: Rc<RefCell<VecDeque<String>>>,
}

impl CollectIo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a line for `input` to read.
    pub fn push_stdin(&self, line: impl Into<String>) {
        self.stdin.borrow_mut().push_back(line.into());
    }

    /// Everything written to standard output so far.
    #[must_use]
    pub fn stdout(&self) -> String {
        self.stdout.borrow().clone()
    }

    /// Everything written to the error sink so far.
    #[must_use]
    pub fn stderr(&self) -> String {
        self.stderr.borrow().clone()
    }
}

impl HostIo for CollectIo {
    fn stdout_write(&mut self, text: &str) {
        self.stdout.borrow_mut().push_str(text);
    }

    fn stdout_push(&mut self, ch: char) {
        self.stdout.borrow_mut().push(ch);
    }

    fn stderr_line(&mut self, line: &str) {
        let mut stderr = self.stderr.borrow_mut();
        stderr.push_str(line);
        stderr.push('\n');
    }

    fn stdin_line(&mut self) -> Option<String> {
        self.stdin.borrow_mut().pop_front()
    }
}
