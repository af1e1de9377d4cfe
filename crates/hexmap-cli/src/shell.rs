//! Line-oriented command loop.

use crate::commands;
use crate::session::{Outcome, Session};
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Read commands from `input` until `quit` or end of input.
///
/// Replies and errors go to `output`; a failing command does not stop the
/// loop. The prompt is only shown when `prompt` is set.
pub fn run_shell<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    mut output: W,
    prompt: bool,
) -> anyhow::Result<()> {
    let mut lines = input.lines();
    loop {
        if prompt {
            write!(output, "hexmap> ")?;
            output.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(output, "error: {e}")?;
                continue;
            }
        };
        debug!(?command, "running command");

        match session.execute(command) {
            Ok(Outcome::Reply(text)) => writeln!(output, "{text}")?,
            Ok(Outcome::Quit) => break,
            Err(e) => writeln!(output, "error: {e}")?,
        }
    }
    info!("Session ended with {} tiles", session.engine().tiles().len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexmap_core::{MapEngine, MemoryStorage, PhysicalCoordinate};

    fn session() -> (Session, MemoryStorage) {
        let storage = MemoryStorage::new();
        let mut engine = MapEngine::new(storage.clone());
        engine.set_window_size(PhysicalCoordinate::new(800.0, 600.0));
        engine.reset().unwrap();
        (Session::new(engine), storage)
    }

    #[test]
    fn test_script_runs_to_quit() {
        let (mut session, storage) = session();
        let script = "\
# a short session
fill grassland
place 1 0
bogus
place 1 0
quit
fill forest
";
        let mut out = Vec::new();
        run_shell(&mut session, script.as_bytes(), &mut out, false).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(
            out.lines().collect::<Vec<_>>(),
            vec![
                "Candidate (complete): Grassland Grassland Grassland Grassland Grassland Grassland",
                "Placed at 1,0",
                "Candidate (empty): -",
                "error: Unknown command 'bogus' (try 'help')",
                "error: Not ready",
            ]
        );
        assert_eq!(session.engine().tiles().len(), 2);
        assert!(storage.contents().unwrap().contains("\"x\":1"));
    }

    #[test]
    fn test_prompt_is_written() {
        let (mut session, _) = session();
        let mut out = Vec::new();
        run_shell(&mut session, "".as_bytes(), &mut out, true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hexmap> ");
    }
}
