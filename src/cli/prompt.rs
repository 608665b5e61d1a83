//! Line-oriented form session.
//!
//! Walks the form fields in order with numbered option lists:
//! - an option typed exactly wins, then a list number, then case-insensitive text
//! - an empty line keeps the current value
//! - `q` cancels the session
//!
//! Reader and writer are generic so sessions can be scripted in tests.

use std::io::{BufRead, Write};

use crate::app::context::AppContext;
use crate::app::pipeline::submit;
use crate::domain::{MODEL_YEAR_MAX, MODEL_YEAR_MIN};
use crate::error::AppError;
use crate::form::{Form, FormField};

/// One answer to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Value(String),
    Keep,
    Quit,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn write(&mut self, text: &str) -> Result<(), AppError> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|_| self.output.flush())
            .map_err(|e| AppError::runtime(format!("Failed to write prompt: {e}")))
    }

    /// `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>, AppError> {
        let mut line = String::new();
        let bytes = self
            .input
            .read_line(&mut line)
            .map_err(|e| AppError::runtime(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn reply(&mut self) -> Result<Reply, AppError> {
        let Some(line) = self.read_line()? else {
            return Err(AppError::input(
                "No input received. Use `carprice predict` for non-interactive use.",
            ));
        };
        if line.eq_ignore_ascii_case("q") {
            return Ok(Reply::Quit);
        }
        if line.is_empty() {
            return Ok(Reply::Keep);
        }
        Ok(Reply::Value(line))
    }

    /// Ask for free text.
    pub fn ask(&mut self, prompt: &str) -> Result<Reply, AppError> {
        self.write(prompt)?;
        self.reply()
    }

    /// Show numbered options and read a choice until it names one of them.
    pub fn choose(
        &mut self,
        label: &str,
        options: &[String],
        current: Option<&str>,
    ) -> Result<Reply, AppError> {
        let mut listing = format!("{label}:\n");
        for (idx, option) in options.iter().enumerate() {
            listing.push_str(&format!("{:>3}) {option}\n", idx + 1));
        }
        self.write(&listing)?;

        loop {
            let keep = current.map(|c| format!(", Enter keeps '{c}'")).unwrap_or_default();
            self.write(&format!(
                "Select by number (1-{}) or type a value{keep} (q to quit): ",
                options.len()
            ))?;

            let text = match self.reply()? {
                Reply::Value(text) => text,
                Reply::Keep if current.is_some() => return Ok(Reply::Keep),
                Reply::Keep => continue,
                Reply::Quit => return Ok(Reply::Quit),
            };

            // An option spelled exactly like the input beats a list number.
            if let Some(option) = options.iter().find(|o| **o == text) {
                return Ok(Reply::Value(option.clone()));
            }
            if let Ok(choice) = text.parse::<usize>() {
                if (1..=options.len()).contains(&choice) {
                    return Ok(Reply::Value(options[choice - 1].clone()));
                }
            }
            if let Some(option) = options.iter().find(|o| o.eq_ignore_ascii_case(&text)) {
                return Ok(Reply::Value(option.clone()));
            }
            self.write(&format!(
                "Invalid choice: {text}. Enter a number between 1 and {}.\n",
                options.len()
            ))?;
        }
    }
}

/// Run form sessions until the user quits or declines another estimate.
pub fn run_session<R: BufRead, W: Write>(
    ctx: &AppContext,
    prompter: &mut Prompter<R, W>,
) -> Result<(), AppError> {
    loop {
        let mut form = Form::new(ctx.catalog(), ctx.taxonomy());
        if !fill_form(&mut form, prompter)? {
            return Ok(());
        }

        match form.request() {
            Ok(request) => {
                prompter.write(&format!(
                    "\n{}",
                    crate::report::format_request_summary(&request)
                ))?;
                let outcome = submit(ctx, &request)?;
                prompter.write(&format!("{}\n\n", outcome.message()))?;
            }
            Err(err) => prompter.write(&format!("{err}\n\n"))?,
        }

        prompter.write("Price another car? [y/N]: ")?;
        match prompter.read_line()? {
            Some(answer) if answer.eq_ignore_ascii_case("y") => continue,
            _ => return Ok(()),
        }
    }
}

/// `false` when the user quit.
fn fill_form<R: BufRead, W: Write>(
    form: &mut Form<'_>,
    prompter: &mut Prompter<R, W>,
) -> Result<bool, AppError> {
    for field in FormField::ALL {
        if field.is_numeric() {
            if !ask_numeric(form, field, prompter)? {
                return Ok(false);
            }
            continue;
        }

        let options = form.options(field);
        if options.is_empty() {
            prompter.write(&format!("{}: (none available)\n", field.label()))?;
            continue;
        }
        let current = form.value(field);
        match prompter.choose(field.label(), &options, current.as_deref())? {
            Reply::Value(value) => form.select(field, &value)?,
            Reply::Keep => {}
            Reply::Quit => return Ok(false),
        }
    }
    Ok(true)
}

fn ask_numeric<R: BufRead, W: Write>(
    form: &mut Form<'_>,
    field: FormField,
    prompter: &mut Prompter<R, W>,
) -> Result<bool, AppError> {
    let range = match field {
        FormField::ModelYear => format!(" [{MODEL_YEAR_MIN}-{MODEL_YEAR_MAX}]"),
        _ => String::new(),
    };
    loop {
        let current = form.value(field).unwrap_or_default();
        let prompt = format!("{}{range} ({current}): ", field.label());
        match prompter.ask(&prompt)? {
            Reply::Value(text) => match form.select(field, &text) {
                Ok(()) => return Ok(true),
                Err(err) => prompter.write(&format!("{err}\n"))?,
            },
            Reply::Keep => return Ok(true),
            Reply::Quit => return Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn choose_accepts_number_or_text() {
        let opts = options(&["Audi", "Ford", "Toyota"]);
        let mut p = prompter("2\ntoyota\n");
        assert_eq!(p.choose("Brand", &opts, None).unwrap(), Reply::Value("Ford".into()));
        assert_eq!(p.choose("Brand", &opts, None).unwrap(), Reply::Value("Toyota".into()));
    }

    #[test]
    fn exact_label_beats_list_number() {
        let opts = options(&["F", "Transmission w/Dual Shift Mode", "2", "6-Speed"]);
        let mut p = prompter("2\n4\n");
        assert_eq!(p.choose("Transmission option", &opts, None).unwrap(), Reply::Value("2".into()));
        assert_eq!(p.choose("Transmission option", &opts, None).unwrap(), Reply::Value("6-Speed".into()));
    }

    #[test]
    fn choose_retries_invalid_input() {
        let opts = options(&["Audi", "Ford"]);
        let mut p = prompter("9\nLada\n1\n");
        assert_eq!(p.choose("Brand", &opts, None).unwrap(), Reply::Value("Audi".into()));
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("  1) Audi\n  2) Ford\n"));
        assert!(out.contains("Invalid choice: 9."));
        assert!(out.contains("Invalid choice: Lada."));
    }

    #[test]
    fn choose_keep_and_quit() {
        let opts = options(&["Audi", "Ford"]);
        let mut p = prompter("\nq\n");
        assert_eq!(p.choose("Brand", &opts, Some("Ford")).unwrap(), Reply::Keep);
        assert_eq!(p.choose("Brand", &opts, Some("Ford")).unwrap(), Reply::Quit);
    }

    #[test]
    fn end_of_input_is_an_error() {
        let mut p = prompter("");
        let err = p.ask("Model year: ").unwrap_err();
        assert!(err.message().starts_with("No input received"));
    }

    #[test]
    fn full_session_prices_the_camry() {
        let ctx = context();
        // Brand, fuel, model, year (bad then good), km, type, speed, label, accident, another?
        let script = "Toyota\nGasoline\nCamry\n1989\n2015\n50000\nAutomatic\n6-Speed\n6-Speed A/T\nNo\nn\n";
        let mut p = prompter(script);
        run_session(&ctx, &mut p).unwrap();
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("Model year must be between 1990 and 2025, got 1989."));
        assert!(out.contains("Model          Camry\n"));
        assert!(out.contains("Estimated price: ₹150.50"));
    }

    #[test]
    fn quitting_mid_form_ends_quietly() {
        let ctx = context();
        let mut p = prompter("Ford\nq\n");
        run_session(&ctx, &mut p).unwrap();
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(!out.contains("Estimated price"));
    }
}
