use anyhow::Result;
use clap::Parser;
use prompt_image_batch::cli::CliOptions;
use prompt_image_batch::utils::logging;
use prompt_image_batch::{App, Config, Secrets};

#[tokio::main]
async fn main() -> Result<()> {
    let opts = CliOptions::parse();

    // 初始化日志
    logging::init(opts.debug);

    // 加载配置（文件 + 环境变量）
    let config = Config::load(opts.config.as_deref())?;
    let secrets = Secrets::from_env()?;

    // 初始化并运行应用
    let summary = App::initialize(config, secrets)?
        .run(&opts.input, opts.send)
        .await?;

    if let Some(report) = &summary.delivery {
        if !report.all_succeeded() {
            anyhow::bail!(
                "部分邮件发送失败 ({}/{})",
                report.success_count(),
                report.outcomes.len()
            );
        }
    }

    Ok(())
}
