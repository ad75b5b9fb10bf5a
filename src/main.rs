use clap::Parser;
use cricket_stats::{cli, config, feed, loader, server};
use cli::{Cli, Commands};
use config::Config;
use cricket_stats_common::{predict_text, MatchSummary, RoleFilter, ThreadDice};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Serve { addr } => {
            let mut config = config;
            if let Some(addr) = addr {
                config.bind_addr = addr;
            }
            println!("🏏 cricket-stats - サーバ起動 ({})\n", config.bind_addr);
            server::serve(&config).await?;
        }

        Commands::Predict { player, opponent, data } => {
            let path = data.unwrap_or_else(|| config.player_data_path.clone());
            let table = loader::load_player_table(&path, &config.player_layout())?;
            let prediction = predict_text(&table, &player, &opponent, &mut ThreadDice::default());
            println!("{} vs {}: {}", player, opponent, prediction);
        }

        Commands::Players { team, role, data } => {
            let path = data.unwrap_or_else(|| config.player_data_path.clone());
            let table = loader::load_player_table(&path, &config.player_layout())?;
            let role_filter = role.parse::<RoleFilter>().unwrap_or_default();

            println!("チーム: {}", table.teams().join(", "));
            println!("対戦相手: {}", table.opponents().join(", "));
            println!("選手:");
            for player in table.players(team.as_deref(), role_filter) {
                println!("  {}", player);
            }
        }

        Commands::Compare { team1, team2, data } => {
            let path = data.unwrap_or_else(|| config.team_data_path.clone());
            let table = loader::load_team_table(&path, &config.team_sheet)?;

            match table.compare(&team1, &team2) {
                Some(result) => {
                    println!(
                        "{}: {:.2}% (勝率 {:.2}%)",
                        team1, result.team1_win_percentage, result.team1_win_rate
                    );
                    println!(
                        "{}: {:.2}% (勝率 {:.2}%)",
                        team2, result.team2_win_percentage, result.team2_win_rate
                    );
                    println!("予想勝者: {} (差 {})", result.winner, result.confidence);
                }
                None => println!("予測できません（未知のチーム、または同一チーム）"),
            }
        }

        Commands::Matches { json } => {
            let sources = feed::ApiSources::from_config(&config)?;
            let buckets = feed::fetch_match_buckets(&sources).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&buckets)?);
            } else {
                print_bucket("Live", &buckets.live);
                print_bucket("Upcoming", &buckets.upcoming);
                print_bucket("Completed", &buckets.completed);
            }
        }

        Commands::Config { set_gemini_key, set_cricapi_key, show } => {
            let mut config = config;

            if let Some(key) = set_gemini_key {
                config.set_gemini_key(key)?;
                println!("✔ Gemini APIキーを設定しました");
            }

            if let Some(key) = set_cricapi_key {
                config.set_cricapi_key(key)?;
                println!("✔ CricAPIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.gemini_model);
                println!(
                    "  選手データ: {} ({})",
                    config.player_data_path.display(),
                    config.player_sheet
                );
                println!(
                    "  チームデータ: {} ({})",
                    config.team_data_path.display(),
                    config.team_sheet
                );
                println!("  待ち受け: {}", config.bind_addr);
                println!("  Gemini APIキー: {}", key_status(config.gemini_api_key().is_ok()));
                println!("  CricAPIキー: {}", key_status(config.cricapi_api_key().is_ok()));
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn key_status(is_set: bool) -> &'static str {
    if is_set {
        "設定済み"
    } else {
        "未設定"
    }
}

fn print_bucket(label: &str, matches: &[MatchSummary]) {
    println!("[{}] {}件", label, matches.len());
    for m in matches {
        println!("  {} @ {} - {}", m.name, m.venue, m.status_text);
        for score in &m.scores {
            println!("    {}: {}/{} ({} ov)", score.team, score.runs, score.wickets, score.overs);
        }
    }
}
