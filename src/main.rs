use loadstage::error::AppResult;

fn main() -> AppResult<()> {
    loadstage::entry::run()
}
