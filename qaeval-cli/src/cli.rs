use crate::runner::{DEFAULT_INPUT, DEFAULT_OUTPUT, RunOptions};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "qaeval-evaluate", version)]
#[command(
    about = "Score question/answer pairs with RAGAS-style metrics",
    long_about = None
)]
pub struct EvaluateCli {
    /// CSV file with question, answer, reference and category columns
    #[arg(default_value = DEFAULT_INPUT)]
    pub csv_path: PathBuf,
}

impl EvaluateCli {
    /// Results always go to the fixed results file in the working directory.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            csv_path: self.csv_path.clone(),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "qaeval-check-config", version)]
#[command(
    about = "Check the Azure OpenAI environment and test connectivity",
    long_about = None
)]
pub struct CheckConfigCli {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_defaults() {
        let cli = EvaluateCli::try_parse_from(["qaeval-evaluate"]).unwrap();
        let options = cli.run_options();
        assert_eq!(options.csv_path, PathBuf::from(DEFAULT_INPUT));
        assert_eq!(
            options.output_path,
            PathBuf::from("ragas_evaluation_results.csv")
        );
    }

    #[test]
    fn test_evaluate_positional_path() {
        let args = ["qaeval-evaluate", "data/qa.csv"];
        let cli = EvaluateCli::try_parse_from(args).unwrap();
        let options = cli.run_options();
        assert_eq!(options.csv_path, PathBuf::from("data/qa.csv"));
        assert_eq!(options.output_path, PathBuf::from(DEFAULT_OUTPUT));
    }

    #[test]
    fn test_evaluate_has_no_output_flag() {
        let args = ["qaeval-evaluate", "-o", "elsewhere.csv"];
        assert!(EvaluateCli::try_parse_from(args).is_err());
        let args = ["qaeval-evaluate", "--output", "elsewhere.csv"];
        assert!(EvaluateCli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_only_help_and_version_flags() {
        let err = EvaluateCli::try_parse_from(["qaeval-evaluate", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        let err = EvaluateCli::try_parse_from(["qaeval-evaluate", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_check_config_takes_no_arguments() {
        let bare = CheckConfigCli::try_parse_from(["qaeval-check-config"]);
        assert!(bare.is_ok());
        let extra = CheckConfigCli::try_parse_from(["qaeval-check-config", "extra"]);
        assert!(extra.is_err());
    }
}
