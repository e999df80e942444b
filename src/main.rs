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

use clap::Parser;
use plinth::config::{Command, Config};
use plinth::manifest::StackManifest;
use tracing::Level;

fn main() -> anyhow::Result<()> {
    // This returns an error if the `.env` file doesn't exist, but that's not what we want
    // since the environment may already be set up by the caller.
    dotenv::dotenv().ok();

    // Parse our configuration from the command line and the environment.
    // This will exit with a help message if something is wrong.
    let config = Config::parse();

    // Logs go to stderr, stdout is reserved for the template.
    let level = if config.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();

    match config.command {
        Command::Synth(args) => plinth::synth::run(&args),
        Command::Schema => {
            let schema = schemars::schema_for!(StackManifest);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}
