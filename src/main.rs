use caskwork::ui::output;

fn main() {
    if let Err(err) = caskwork::cli::run() {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
