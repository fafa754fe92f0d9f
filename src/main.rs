// Uboot Transfer - U-Boot serial console driver
use uboot_transfer::cli::{
    args::BANNER,
    commands::execute_command,
    parse_args, ParseOutcome,
};

#[tokio::main]
async fn main() {
    println!("{}", BANNER);

    let args = match parse_args(std::env::args_os()) {
        ParseOutcome::Run(args) => args,
        ParseOutcome::Exit(code) => std::process::exit(code),
    };

    let code = execute_command(args).await;
    std::process::exit(code);
}
