use std::io::{BufRead, Write};
use std::path::Path;

use facetag_core::capture::domain::frame_source::FrameSource;
use facetag_core::capture::infrastructure::image_file_source::ImageFileSource;
use facetag_core::pipeline::analyze_use_case::AnalyzeFrameUseCase;
use facetag_core::pipeline::report::format_report;
use facetag_core::shared::frame::Frame;

/// The blocking numbered menu of the heuristic demo.
///
/// One full capture → detect → classify → print cycle per selection.
/// Unknown input re-prompts without touching any state; analysis errors
/// print and drop back to the menu instead of ending the session.
pub struct MenuLoop {
    source: Box<dyn FrameSource>,
    use_case: AnalyzeFrameUseCase,
}

impl MenuLoop {
    pub fn new(source: Box<dyn FrameSource>, use_case: AnalyzeFrameUseCase) -> Self {
        Self { source, use_case }
    }

    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> std::io::Result<()> {
        loop {
            writeln!(output)?;
            writeln!(output, "1) Capture and analyze")?;
            writeln!(output, "2) Analyze image file")?;
            writeln!(output, "3) Exit")?;
            write!(output, "Choice: ")?;
            output.flush()?;

            let Some(line) = read_line(input)? else {
                break; // EOF
            };

            match line.trim() {
                "1" => self.capture_and_analyze(output)?,
                "2" => self.analyze_file(input, output)?,
                "3" => {
                    writeln!(output, "Bye.")?;
                    break;
                }
                other => writeln!(output, "Invalid choice '{other}', enter 1-3.")?,
            }
        }
        Ok(())
    }

    fn capture_and_analyze<W: Write>(&mut self, output: &mut W) -> std::io::Result<()> {
        match self.source.next_frame() {
            Ok(frame) => self.analyze(&frame, output),
            Err(e) => writeln!(output, "Capture failed: {e}"),
        }
    }

    fn analyze_file<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> std::io::Result<()> {
        write!(output, "Image path: ")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(());
        };
        let path = line.trim();
        if path.is_empty() {
            return writeln!(output, "No path given.");
        }

        let frame = ImageFileSource::open(Path::new(path)).and_then(|mut s| s.next_frame());
        match frame {
            Ok(frame) => self.analyze(&frame, output),
            Err(e) => writeln!(output, "Cannot load image: {e}"),
        }
    }

    fn analyze<W: Write>(&mut self, frame: &Frame, output: &mut W) -> std::io::Result<()> {
        match self.use_case.execute(frame) {
            Ok(analyses) => write!(output, "{}", format_report(&analyses)),
            Err(e) => writeln!(output, "Analysis failed: {e}"),
        }
    }
}

/// `Ok(None)` on EOF, `Ok(Some(line))` otherwise.
fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
