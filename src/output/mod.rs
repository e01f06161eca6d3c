use console::style;

use crate::pipeline::PipelineOutcome;
use crate::YtsoundError;

/// Lines printed after a successful run
pub fn format_outcome(outcome: &PipelineOutcome) -> String {
    format!(
        "File saved in: {}\nMusic duration: {}",
        outcome.path.display(),
        outcome.duration
    )
}

/// Print a successful run to the console
pub fn print_outcome(outcome: &PipelineOutcome) {
    println!("{}", style(format_outcome(outcome)).green());
}

/// Print a failed run as a single line
pub fn print_error(error: &YtsoundError) {
    eprintln!("{}", style(error).red());
}
