//! Shell completion scripts, generated from the clap command tree

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::Shell;

use crate::Cli;

/// Write the completion script for `shell` to stdout.
pub fn generate_completion(shell: Shell) {
    write_completion(shell, &mut io::stdout());
}

fn write_completion(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin_name, out);
}
