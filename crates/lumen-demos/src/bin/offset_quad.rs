use lumen_engine::demo::Demo;
use lumen_engine::logging::{init_logging, LoggingConfig};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    Demo::new(lumen_demos::offset_quad::config()?)?.run()
}
