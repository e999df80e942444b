// Copyright (c) The Plinth Authors. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// The configuration parameters for the application.
///
/// These can either be passed on the command line, or pulled from environment variables.
/// For development convenience, these can also be read from a `.env` file in the working
/// directory where the application is started.
#[derive(Parser, Debug)]
#[command(author, version, about = "Synthesize resource templates from stack manifests", long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,

    /// Print debug logs to stderr.
    #[arg(short, long, global = true, env = "PLINTH_VERBOSE")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synthesize the template of a stack manifest.
    Synth(SynthArgs),
    /// Print the JSON schema of the stack manifest.
    Schema,
}

#[derive(Args, Debug)]
pub struct SynthArgs {
    /// The stack manifest, in YAML, TOML or JSON format.
    #[arg(short, long, env = "PLINTH_MANIFEST")]
    pub manifest: PathBuf,

    /// Which output file to write to. If not specified, will print to stdout.
    #[arg(short, long, env = "PLINTH_OUTPUT")]
    pub output: Option<PathBuf>,

    /// The format of the synthesized template.
    #[arg(short, long, env = "PLINTH_FORMAT", value_enum, default_value_t = Format::Json)]
    pub format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_synth() {
        let config = Config::parse_from(["plinth", "synth", "--manifest", "stack.yaml", "--format", "yaml"]);

        match config.command {
            Command::Synth(args) => {
                assert_eq!(args.manifest, PathBuf::from("stack.yaml"));
                assert_eq!(args.output, None);
                assert_eq!(args.format, Format::Yaml);
            }
            Command::Schema => panic!("expected the synth command"),
        }
        assert!(!config.verbose);
    }

    #[test]
    fn test_parse_schema() {
        let config = Config::parse_from(["plinth", "schema", "--verbose"]);

        assert!(matches!(config.command, Command::Schema));
        assert!(config.verbose);
    }
}
