use std::process::ExitCode;

fn main() -> ExitCode {
    match bioformats_tidy::run() {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
