use anyhow::{Context, Result};
use arithmetic_evaluator::interpreter::parser::{ParserConfig, TrailingInput};
use arithmetic_evaluator::interpreter::{convert_with, evaluate_with, tokens_to_string};
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use log::{debug, info};
use std::io;
use std::io::BufRead;

/// Evaluates arithmetic expressions over integers with + - * / and parentheses
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Arguments {
    /// The expression to evaluate. Each line of standard input is evaluated when omitted
    expression: Option<String>,

    /// Print the syntax tree of the expression instead of its value
    #[clap(long, conflicts_with = "normalize")]
    tree: bool,

    /// Print the expression with only the parentheses it needs
    #[clap(long)]
    normalize: bool,

    /// Ignore anything after a complete expression instead of failing
    #[clap(long)]
    allow_trailing: bool,

    #[clap(flatten)]
    verbose: Verbosity,
}

impl Arguments {
    fn parser_config(&self) -> ParserConfig {
        let trailing_input = if self.allow_trailing {
            TrailingInput::Ignore
        } else {
            TrailingInput::Reject
        };
        ParserConfig::new().with_trailing_input(trailing_input)
    }

    fn run(&self, expression: &str) -> Result<String> {
        let config = self.parser_config();
        if self.tree {
            let tree = convert_with(expression, config)?;
            Ok(tree.to_string().trim_end().to_string())
        } else if self.normalize {
            let tree = convert_with(expression, config)?;
            tokens_to_string(tree.to_infix())
        } else {
            Ok(evaluate_with(expression, config)?.to_string())
        }
    }
}

fn main() -> Result<()> {
    let args = Arguments::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();
    debug!("{:?}", args);

    match &args.expression {
        Some(expression) => println!("{}", args.run(expression)?),
        None => {
            for (number, line) in io::stdin().lock().lines().enumerate() {
                let line = line.context("could not read standard input")?;
                if line.trim().is_empty() {
                    continue;
                }
                info!("evaluating line {}", number + 1);
                let output = args
                    .run(&line)
                    .with_context(|| format!("line {}", number + 1))?;
                println!("{}", output);
            }
        }
    }
    Ok(())
}
