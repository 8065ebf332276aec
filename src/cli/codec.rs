//! `repeatkit codec`: the attribute form of values.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::codec;

#[derive(Args, Debug)]
pub struct CodecCommand {
    #[command(subcommand)]
    action: CodecAction,
}

#[derive(Subcommand, Debug)]
enum CodecAction {
    /// Print the attribute form of a JSON value
    Encode {
        /// JSON text; anything that is not valid JSON is taken as a plain string
        value: String,
    },

    /// Print the JSON value an attribute string decodes to
    Decode {
        /// Attribute text; empty or `undefined` decodes to absent
        text: String,

        /// Pretty-print the decoded value
        #[arg(long)]
        pretty: bool,
    },
}

impl CodecCommand {
    pub fn execute(self) -> Result<()> {
        println!("{}", self.run()?);
        Ok(())
    }

    fn run(&self) -> Result<String> {
        match &self.action {
            CodecAction::Encode {
                value,
            } => {
                let value = serde_json::from_str(value)
                    .unwrap_or_else(|_| serde_json::Value::String(value.clone()));
                Ok(codec::encode(Some(&value)))
            }
            CodecAction::Decode {
                text,
                pretty,
            } => match codec::decode(text) {
                None => Ok("undefined".to_string()),
                Some(value) if *pretty => {
                    serde_json::to_string_pretty(&value).context("Failed to format decoded value")
                }
                Some(value) => Ok(value.to_string()),
            },
        }
    }
}
