use anyhow::Context;
use clap::Parser;
use forge_detect::{analyzer, cli, config, error, logging, report, scanner};
use analyzer::ProgressBarObserver;
use cli::{Cli, Commands};
use config::Config;
use error::ForgeDetectError;
use forge_detect::common::initial_stages;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("設定の読み込みに失敗しました")?;
    logging::init_tracing(cli.verbose, config.log_json);

    match cli.command {
        Commands::Analyze { path, output, seed, json, recursive, no_progress, digest } => {
            if !json {
                println!("🔍 forge-detect - 画像改ざん解析\n");
                println!("[1/3] 画像を読み込み中...");
            }

            let images = scanner::collect_inputs(&path, recursive, config.max_upload_bytes())?;
            if !json {
                println!("✔ {}枚の画像を検出\n", images.len());
            }

            let seed = match seed {
                Some(seed) => Some(seed),
                None => config.effective_seed()?,
            };
            let sequencer = Arc::new(analyzer::build_sequencer(seed));

            let progress = (!no_progress && !json)
                .then(|| Arc::new(ProgressBarObserver::new(sequencer.stage_count())));
            if let Some(progress) = &progress {
                sequencer.add_observer(progress.clone());
            }

            // Ctrl-Cで実行中の解析を中断
            let interrupt = {
                let sequencer = Arc::clone(&sequencer);
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        sequencer.reset();
                    }
                })
            };

            if !json {
                println!("[2/3] 解析中...{}", seed.map(|s| format!(" (seed: {})", s)).unwrap_or_default());
            }
            let files: Vec<_> = images.iter().map(|img| img.file.clone()).collect();
            let outcome = analyzer::analyze_files(&sequencer, &files, cli.verbose).await;
            interrupt.abort();

            let analyses = match outcome {
                Ok(analyses) => {
                    if let Some(progress) = &progress {
                        progress.finish();
                    }
                    analyses
                }
                Err(ForgeDetectError::Cancelled) => {
                    if let Some(progress) = &progress {
                        progress.abandon();
                    }
                    println!("\n✖ 解析を中断しました");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            let mut reports = Vec::new();
            for (image, analysis) in images.iter().zip(analyses) {
                match analysis.outcome {
                    Ok(result) => {
                        if !json {
                            println!("\n── {} ──", image.file.name);
                            if cli.verbose {
                                print!("{}", report::render_steps(&analysis.steps));
                                println!();
                            }
                            print!("{}", report::render_text(&result));
                        }

                        let mut entry = report::ReportFile::new(&image.file, analysis.steps, result);
                        if digest {
                            entry = entry.with_digest_of(&image.path)?;
                        }
                        reports.push(entry);
                    }
                    Err(reason) => {
                        eprintln!("⚠ スキップ: {} ({})", image.file.name, reason);
                    }
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            }

            if let Some(output) = output {
                if !json {
                    println!("\n[3/3] レポートを保存中...");
                }
                report::save_reports(&reports, &output)?;
                if !json {
                    println!("✔ レポートを保存: {}", output.display());
                }
            }

            if !json {
                println!("\n✅ 解析完了");
            }
        }

        Commands::Stages => {
            println!("解析ステージ:");
            for (idx, stage) in initial_stages().iter().enumerate() {
                println!("  {}. {} [{}]", idx + 1, stage.label, stage.id);
                println!("     {}", stage.description);
            }
        }

        Commands::Config { set_seed, clear_seed, set_max_upload_mb, show } => {
            let mut config = config;

            if let Some(seed) = set_seed {
                config.set_seed(Some(seed))?;
                println!("✔ シードを設定しました: {}", seed);
            }

            if clear_seed {
                config.set_seed(None)?;
                println!("✔ シードを解除しました");
            }

            if let Some(mb) = set_max_upload_mb {
                config.set_max_upload_mb(mb)?;
                println!("✔ アップロード上限を設定しました: {}MB", mb);
            }

            if show {
                println!("設定:");
                println!("  パス: {}", Config::config_path()?.display());
                println!("  アップロード上限: {}MB", config.max_upload_mb);
                match config.effective_seed()? {
                    Some(seed) => println!("  シード: {}", seed),
                    None => println!("  シード: 未設定（毎回ランダム）"),
                }
                println!("  JSONログ: {}", if config.log_json { "有効" } else { "無効" });
            }
        }
    }

    Ok(())
}
