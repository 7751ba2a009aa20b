use std::process::ExitCode;

fn main() -> ExitCode {
    match otpvault::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
