use crate::concat::ConcatReport;
use crate::error::{FlatCatError, UserFriendlyError};
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

static CHECKMARK: Emoji = Emoji("✅ ", "");
static CROSS: Emoji = Emoji("❌ ", "");
static INFO: Emoji = Emoji("ℹ️  ", "");
static WARNING: Emoji = Emoji("⚠️  ", "");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    // Errors are always shown, even in quiet mode.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human if self.use_colors => {
                eprintln!("{}{}", CROSS, style(message).red().bold())
            }
            OutputMode::Json => eprintln!(
                "{}",
                serde_json::json!({ "type": "error", "message": message })
            ),
            _ => eprintln!("{}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human if self.use_colors => {
                    eprintln!("{}{}", WARNING, style(message).yellow().bold())
                }
                OutputMode::Json => {}
                _ => eprintln!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human if self.use_colors => {
                    println!("{}{}", INFO, style(message).cyan())
                }
                OutputMode::Json => {}
                _ => println!("{}", message),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &FlatCatError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Json => eprintln!(
                    "{}",
                    serde_json::json!({ "type": "suggestion", "message": suggestion })
                ),
                _ => {
                    if self.use_colors {
                        eprintln!("{}", style(format!("Suggestion: {}", suggestion)).cyan());
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
            }
        }
    }

    pub fn print_report(&self, report: &ConcatReport) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => self.print_human_report(report),
            OutputMode::Json => self.print_json_report(report),
            OutputMode::Plain => self.print_plain_report(report),
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_report(&self, report: &ConcatReport) {
        if report.dry_run {
            self.print_dry_run_listing(report);
            return;
        }

        let summary = report.summary_line();
        if self.use_colors {
            println!("{}{}", CHECKMARK, style(summary).green().bold());
        } else {
            println!("{}", summary);
        }

        if report.has_read_errors() {
            self.warning(&format!(
                "{} files could not be read",
                report.read_errors.len()
            ));
            if self.verbose_level > 0 {
                for failure in &report.read_errors {
                    eprintln!("  - {}: {}", failure.path, failure.message);
                }
            }
        }
    }

    fn print_plain_report(&self, report: &ConcatReport) {
        if report.dry_run {
            self.print_dry_run_listing(report);
            return;
        }

        println!("{}", report.summary_line());
        for failure in &report.read_errors {
            eprintln!("ERROR: {}: {}", failure.path, failure.message);
        }
    }

    fn print_dry_run_listing(&self, report: &ConcatReport) {
        for path in &report.files {
            println!("{}", path);
        }
        println!(
            "{} files would be concatenated into '{}'",
            report.files_concatenated, report.output
        );
    }

    fn print_json_report(&self, report: &ConcatReport) {
        println!(
            "{}",
            serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
        );
    }
}
