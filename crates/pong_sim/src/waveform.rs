//! Waveform recording for testbench runs.
//!
//! A [`Testbench`](crate::Testbench) reports pin and register changes to a
//! [`WaveformRecorder`]. [`VcdRecorder`] turns them into Value Change Dump
//! text for any VCD viewer; [`VcdFile`] puts that text in a file, gzipped
//! when the name ends in `.gz`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::SimError;

/// Recorder-facing handle for one traced signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TraceId(pub u32);

/// Sink for traced signal changes.
///
/// Call order: scopes and signals first, then changes in time order, then
/// [`WaveformRecorder::finalize`] once.
pub trait WaveformRecorder {
    /// Registers a signal for recording.
    fn register_signal(&mut self, id: TraceId, name: &str, width: u32) -> Result<(), SimError>;

    /// Opens a nested scope.
    fn begin_scope(&mut self, name: &str) -> Result<(), SimError>;

    /// Closes the innermost open scope.
    fn end_scope(&mut self) -> Result<(), SimError>;

    /// Records a value change at the given time (in femtoseconds).
    fn record_change(&mut self, time_fs: u64, id: TraceId, value: u64) -> Result<(), SimError>;

    /// Ends the dump and flushes everything written so far.
    fn finalize(&mut self) -> Result<(), SimError>;
}

/// Where a [`VcdRecorder`] is in the file layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    /// Nothing written yet.
    Empty,
    /// Header written; scopes and variables may follow.
    Definitions,
    /// Value changes, last timestamp written.
    Changes(u64),
}

/// One registered variable.
#[derive(Clone, Debug)]
struct VcdVar {
    code: String,
    width: u32,
}

/// Writes IEEE 1364 Value Change Dump text.
///
/// Identifier codes are drawn from the printable range `!`..`~`, one
/// character for the first 94 variables and longer codes after that.
pub struct VcdRecorder<W: Write> {
    writer: W,
    vars: Vec<Option<VcdVar>>,
    registered: u32,
    depth: usize,
    section: Section,
}

impl<W: Write> VcdRecorder<W> {
    /// Creates a recorder writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            vars: Vec::new(),
            registered: 0,
            depth: 0,
            section: Section::Empty,
        }
    }

    /// Consumes the recorder and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn open_definitions(&mut self) -> Result<(), SimError> {
        if self.section == Section::Empty {
            write!(
                self.writer,
                "$version\n  vgapong testbench\n$end\n$timescale\n  1fs\n$end\n"
            )?;
            self.section = Section::Definitions;
        }
        Ok(())
    }

    fn close_definitions(&mut self) -> Result<(), SimError> {
        self.open_definitions()?;
        if self.section == Section::Definitions {
            writeln!(self.writer, "$enddefinitions $end")?;
        }
        Ok(())
    }

    fn var(&self, id: TraceId) -> Result<&VcdVar, SimError> {
        self.vars
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or_else(|| bad_input(format!("unregistered VCD signal {}", id.0)))
    }

    /// Identifier code for the `index`-th variable (bijective base 94).
    fn make_id_code(index: u32) -> String {
        let mut n = u64::from(index) + 1;
        let mut code = Vec::new();
        while n > 0 {
            n -= 1;
            code.push(b'!' + (n % 94) as u8);
            n /= 94;
        }
        code.into_iter().map(char::from).collect()
    }

    /// `0`/`1` for scalars, `b` plus `width` binary digits for vectors.
    fn format_value(value: u64, width: u32) -> String {
        if width == 1 {
            return (value & 1).to_string();
        }
        let digits = width as usize;
        let masked = if width >= 64 {
            value
        } else {
            value & ((1u64 << width) - 1)
        };
        format!("b{masked:0digits$b}")
    }
}

fn bad_input(message: String) -> SimError {
    SimError::WaveformIo(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        message,
    ))
}

impl<W: Write> WaveformRecorder for VcdRecorder<W> {
    fn register_signal(&mut self, id: TraceId, name: &str, width: u32) -> Result<(), SimError> {
        self.open_definitions()?;
        if self.section != Section::Definitions {
            return Err(bad_input(format!("signal {name} registered after dumping began")));
        }
        let code = Self::make_id_code(self.registered);
        self.registered += 1;
        writeln!(self.writer, "$var wire {width} {code} {name} $end")?;

        let slot = id.0 as usize;
        if self.vars.len() <= slot {
            self.vars.resize(slot + 1, None);
        }
        self.vars[slot] = Some(VcdVar { code, width });
        Ok(())
    }

    fn begin_scope(&mut self, name: &str) -> Result<(), SimError> {
        self.open_definitions()?;
        writeln!(self.writer, "$scope module {name} $end")?;
        self.depth += 1;
        Ok(())
    }

    fn end_scope(&mut self) -> Result<(), SimError> {
        if self.depth == 0 {
            return Err(bad_input("$upscope without an open scope".into()));
        }
        self.depth -= 1;
        writeln!(self.writer, "$upscope $end")?;
        Ok(())
    }

    fn record_change(&mut self, time_fs: u64, id: TraceId, value: u64) -> Result<(), SimError> {
        let var = self.var(id)?.clone();
        match self.section {
            Section::Changes(t) if t == time_fs => {}
            Section::Changes(_) => writeln!(self.writer, "#{time_fs}")?,
            Section::Empty | Section::Definitions => {
                self.close_definitions()?;
                writeln!(self.writer, "$dumpvars\n#{time_fs}")?;
            }
        }
        self.section = Section::Changes(time_fs);

        let value = Self::format_value(value, var.width);
        if var.width == 1 {
            writeln!(self.writer, "{value}{}", var.code)?;
        } else {
            writeln!(self.writer, "{value} {}", var.code)?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SimError> {
        if !matches!(self.section, Section::Changes(_)) {
            self.close_definitions()?;
            self.section = Section::Changes(0);
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// A buffered writer that finishes its gzip stream on flush.
struct GzFile {
    inner: Option<GzEncoder<BufWriter<File>>>,
}

impl Write for GzFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.inner.as_mut() {
            Some(enc) => enc.write(buf),
            None => Err(std::io::Error::other("gzip stream already finished")),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.inner.as_mut() {
            Some(enc) => enc.flush(),
            None => Ok(()),
        }
    }
}

impl GzFile {
    fn finish(&mut self) -> std::io::Result<()> {
        if let Some(enc) = self.inner.take() {
            enc.finish()?.flush()?;
        }
        Ok(())
    }
}

/// A VCD recorder on a file, gzip-compressed when the path ends in `.gz`.
pub struct VcdFile {
    recorder: VcdFileInner,
}

enum VcdFileInner {
    Plain(VcdRecorder<BufWriter<File>>),
    Gz(VcdRecorder<GzFile>),
}

impl VcdFile {
    /// Creates the file, truncating any existing one.
    pub fn create(path: &Path) -> Result<Self, SimError> {
        let file = BufWriter::new(File::create(path)?);
        let gz = path.extension().is_some_and(|e| e == "gz");
        let recorder = if gz {
            VcdFileInner::Gz(VcdRecorder::new(GzFile {
                inner: Some(GzEncoder::new(file, Compression::default())),
            }))
        } else {
            VcdFileInner::Plain(VcdRecorder::new(file))
        };
        Ok(Self { recorder })
    }

    fn inner(&mut self) -> &mut dyn WaveformRecorder {
        match &mut self.recorder {
            VcdFileInner::Plain(r) => r,
            VcdFileInner::Gz(r) => r,
        }
    }
}

impl WaveformRecorder for VcdFile {
    fn register_signal(&mut self, id: TraceId, name: &str, width: u32) -> Result<(), SimError> {
        self.inner().register_signal(id, name, width)
    }

    fn begin_scope(&mut self, name: &str) -> Result<(), SimError> {
        self.inner().begin_scope(name)
    }

    fn end_scope(&mut self) -> Result<(), SimError> {
        self.inner().end_scope()
    }

    fn record_change(&mut self, time_fs: u64, id: TraceId, value: u64) -> Result<(), SimError> {
        self.inner().record_change(time_fs, id, value)
    }

    fn finalize(&mut self) -> Result<(), SimError> {
        self.inner().finalize()?;
        if let VcdFileInner::Gz(r) = &mut self.recorder {
            r.writer.finish()?;
        }
        Ok(())
    }
}
