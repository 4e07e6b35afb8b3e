use std::process::ExitCode;

use garnet_driver::{Argument, Parser};

fn main() -> ExitCode {
    let argument = Argument::parse();
    garnet_driver::run(argument)
}
