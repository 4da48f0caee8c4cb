use std::io::{self, BufRead, Write};

use crate::interpreter::Interpreter;
use crate::runner::{self, RunOptions};

const COPYRIGHT: &str = "Copyright (c) 2018-2018 Foo Bar Foundation.\nAll Rights Reserved.";
const LICENSE: &str = "MIT License";
const CREDITS: &str = "Thanks to Foo, Bar, Baz, Qux and a cast of thousands for supporting \
                       Lox development. See example.org for more information.";

/// What the REPL does with a line whose first word is a command.
enum Command {
    Exit,
    Show(&'static str),
}

fn command(line: &str) -> Option<Command> {
    match line.split_whitespace().next()? {
        "exit" | "quit" => Some(Command::Exit),
        "copyright" => Some(Command::Show(COPYRIGHT)),
        "license" => Some(Command::Show(LICENSE)),
        "credits" => Some(Command::Show(CREDITS)),
        _ => None,
    }
}

/// Interactive prompt on stdin and stdout.
pub fn start(options: &RunOptions) -> io::Result<()> {
    let stdin = io::stdin();
    run(stdin.lock(), io::stdout(), options)?;
    Ok(())
}

/// Line-mode prompt. Each line goes through the whole pipeline on its own;
/// an error on one line does not affect the next. Prompts, command output
/// and printed values all go to `out`, which is handed back at the end.
pub fn run<R: BufRead, W: Write>(mut input: R, out: W, options: &RunOptions) -> io::Result<W> {
    let mut interpreter = Interpreter::with_output(out);
    intro(interpreter.output_mut())?;

    loop {
        write!(interpreter.output_mut(), "> ")?;
        interpreter.output_mut().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // EOF (Ctrl+D or end of piped input)
            writeln!(interpreter.output_mut())?;
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match command(line) {
            Some(Command::Exit) => break,
            Some(Command::Show(text)) => writeln!(interpreter.output_mut(), "{}", text)?,
            None => {
                let status = runner::run_source(line, &mut interpreter, options);
                tracing::debug!(?status, "repl line finished");
            }
        }
    }

    interpreter.output_mut().flush()?;
    Ok(interpreter.into_output())
}

fn intro<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Lox REPL")?;
    writeln!(
        out,
        "[lox {}] on {}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )?;
    writeln!(
        out,
        "Type \"copyright\", \"credits\" or \"license\" for more information."
    )?;
    writeln!(out, "Type \"exit\" or press Ctrl-D (i.e. EOF) to leave.")
}
