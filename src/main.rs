use pokemon_team_battle::config::DataPaths;
use pokemon_team_battle::scorer::TieBreak;
use pokemon_team_battle::{run, CliOptions, ConfigOverrides, DuelEntry, Strategy};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!(
        "Usage: pokemon-team-battle [--teams teams_config.json] [--stages pokemon_stages.json] \
[--moves moves.json] [--chart chart.json] [--config config.json] \
[--strategy deterministic|stochastic|single] [--runs N] [--seed SEED] [--tie-break a|b|random|draw] [--verbose] \
[--duel NAME:LEVEL:MOVE[:TYPE/TYPE] NAME:LEVEL:MOVE[:TYPE/TYPE]]

--duel resolves one pairing with the selected strategy. --verbose adds the turn log for --strategy single."
    );
    std::process::exit(1);
}

fn parse_tie_break(val: &str) -> anyhow::Result<TieBreak> {
    Ok(match val.to_ascii_lowercase().as_str() {
        "a" | "sidea" => TieBreak::SideA,
        "b" | "sideb" => TieBreak::SideB,
        "random" => TieBreak::Random,
        "draw" => TieBreak::Draw,
        other => anyhow::bail!("--tie-break must be a, b, random or draw, got {other}"),
    })
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut paths = DataPaths::default();
    let mut config_path = None;
    let mut overrides = ConfigOverrides::default();
    let mut duel = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--teams" => {
                paths.teams = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--teams requires a path (e.g. --teams teams_config.json)")
                })?;
            }
            "--stages" => {
                paths.stages = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--stages requires a path (e.g. --stages pokemon_stages.json)")
                })?;
            }
            "--moves" => {
                paths.moves = Some(
                    args.next()
                        .map(PathBuf::from)
                        .ok_or_else(|| anyhow::anyhow!("--moves requires a path"))?,
                );
            }
            "--chart" => {
                paths.chart = Some(
                    args.next()
                        .map(PathBuf::from)
                        .ok_or_else(|| anyhow::anyhow!("--chart requires a path"))?,
                );
            }
            "--config" => {
                config_path = Some(
                    args.next()
                        .map(PathBuf::from)
                        .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?,
                );
            }
            "--strategy" => {
                let val = args.next().ok_or_else(|| {
                    anyhow::anyhow!("--strategy requires deterministic, stochastic or single")
                })?;
                overrides.strategy = Some(val.parse::<Strategy>()?);
            }
            "--runs" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--runs requires a number"))?;
                overrides.runs = Some(val.parse()?);
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                overrides.seed = Some(val.parse()?);
            }
            "--tie-break" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--tie-break requires a, b, random or draw"))?;
                overrides.tie_break = Some(parse_tie_break(&val)?);
            }
            "--verbose" | "-v" => overrides.verbose = true,
            "--duel" => {
                let (Some(a), Some(b)) = (args.next(), args.next()) else {
                    anyhow::bail!("--duel requires two combatants (e.g. --duel Pikachu:10:thunderbolt:electric Starmie:10:water-gun:water/psychic)");
                };
                duel = Some((a.parse::<DuelEntry>()?, b.parse::<DuelEntry>()?));
            }
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    Ok(CliOptions {
        paths,
        config_path,
        overrides,
        duel,
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let opts = parse_args()?;
    run(opts)
}
