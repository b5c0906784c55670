//! rollcall main entrypoint.

use rollcall::run;

fn main() {
    if let Err(e) = run() {
        rollcall::ui::messages::error(format!("Error: {e}"));
        std::process::exit(e.exit_code());
    }
}
