use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deepq::{
    embedding::{collect_features, embed},
    plot::{plot_rewards, plot_scatter},
    simulator::build_simulator,
    ExperimentConfig,
};
use deepq_atari_env::{make_env, wrappers::RecordEpisodes, AtariEnv};
use deepq_candle_agent::dqn::Dqn;
use deepq_core::{
    record::CsvRecorder, replay_buffer::ReplayBuffer, Agent, Configurable, DefaultEvaluator,
    Env as _, Evaluator as _, ReplayBufferBase, Trainer,
};
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};

const CONFIG_FILE: &str = "experiment.yaml";
const EPISODES_FILE: &str = "episodes.csv";
const REWARD_PLOT_FILE: &str = "go.png";
const EMBEDDING_PLOT_FILE: &str = "embedding.png";

type AtariDqn = Dqn<AtariEnv>;

/// Train/eval a DQN agent on an Atari game
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Experiment configuration (YAML), the defaults are used if not given
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of the trained model and training artifacts
    #[arg(long, global = true, default_value = "./model")]
    model_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train the agent
    Train,

    /// Play greedily with the trained agent and record the frames
    Eval {
        /// Render frames in the terminal
        #[arg(long, default_value_t = false)]
        render: bool,
    },

    /// Project the learned features to 2D
    Embed,
}

fn load_config(args: &Args) -> Result<ExperimentConfig> {
    match &args.config {
        Some(path) => ExperimentConfig::load(path),
        None => {
            let path = args.model_dir.join(CONFIG_FILE);
            if path.exists() {
                ExperimentConfig::load(path)
            } else {
                Ok(ExperimentConfig::default())
            }
        }
    }
}

fn train(config: &ExperimentConfig, model_dir: &Path) -> Result<()> {
    fs::create_dir_all(model_dir)
        .with_context(|| format!("Failed to create {:?}", model_dir))?;
    config.save(model_dir.join(CONFIG_FILE))?;

    let mut env = make_env(build_simulator(config)?, &config.env)?;
    let mut agent = AtariDqn::build(config.agent_config(env.n_actions())?)?;
    let mut buffer = ReplayBuffer::build(&config.replay_buffer);
    let mut recorder = CsvRecorder::new(
        model_dir.join(EPISODES_FILE),
        &["episode", "reward", "episode_len", "env_steps", "loss"],
    )?;
    let trainer_config = config
        .trainer
        .clone()
        .model_dir(model_dir.to_string_lossy());
    let mut trainer = Trainer::build(trainer_config);

    let history = trainer.train(&mut agent, &mut env, &mut buffer, &mut recorder)?;
    plot_rewards(&history.points, model_dir.join(REWARD_PLOT_FILE))?;
    info!("Finished training after {} steps", trainer.env_steps());

    Ok(())
}

fn eval(config: &ExperimentConfig, model_dir: &Path, render: bool) -> Result<()> {
    let mut agent = AtariDqn::load_from_dir(model_dir)?;
    agent.eval();

    let sim = RecordEpisodes::new(build_simulator(config)?, &config.video_dir)?;
    let env = make_env(sim, &config.env)?;
    let mut evaluator = DefaultEvaluator::new(env, config.n_eval_episodes).render(render);
    let rewards = evaluator.evaluate(&mut agent)?;
    evaluator.close()?;

    let mean = rewards.iter().sum::<f32>() / rewards.len().max(1) as f32;
    info!("Mean reward of {} episodes: {}", rewards.len(), mean);
    Ok(())
}

fn embed_features(config: &ExperimentConfig, model_dir: &Path) -> Result<()> {
    let mut agent = AtariDqn::load_from_dir(model_dir)?;
    agent.eval();

    let mut env = make_env(build_simulator(config)?, &config.env)?;
    let samples = collect_features(&agent, &mut env, &config.embedding)?;
    let coords = embed(&samples)?;
    let q = samples.iter().map(|s| s.q_max).collect::<Vec<_>>();
    plot_scatter(&coords, &q, model_dir.join(EMBEDDING_PLOT_FILE))?;

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(&args)?;

    match args.command {
        Command::Train => train(&config, &args.model_dir)?,
        Command::Eval { render } => eval(&config, &args.model_dir, render)?,
        Command::Embed => embed_features(&config, &args.model_dir)?,
    }

    Ok(())
}
