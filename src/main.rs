mod entry;
mod logger;
mod shutdown_handlers;

use ratestorm::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
