//! Binary entrypoint for fontload (made by FontLab https://www.fontlab.com/)

fn main() {
    if let Err(err) = fontload_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
