use std::path::Path;

use log::info;

use rs_markov_core::io::{build_output_path, read_lines};
use rs_markov_core::model::config::{ModelConfig, Smoothing};
use rs_markov_core::model::ngram_model::NgramModel;

// Hopefully this prints out some cool names!
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // One name per line; the first 700 train the model, the rest are held
    // out for evaluation
    let corpus_path = Path::new("data/pokemon.txt");
    let lines = read_lines(corpus_path)?;
    let split = 700.min(lines.len());
    let (train_data, test_data) = lines.split_at(split);

    // Katz backoff over 4-grams, with a small prior so every pair keeps
    // strictly positive mass
    let config = ModelConfig {
        order: 4,
        prior: 0.001,
        smoothing: Smoothing::KatzBackoff { k: 0 },
        ..ModelConfig::default()
    };

    // Reuse the cached binary model when present, otherwise train and
    // cache it for the next run (delete the .bin after changing the
    // corpus or the config)
    let cache_path = build_output_path(corpus_path, "bin")?;
    let model = if cache_path.exists() {
        info!("loading cached model from {}", cache_path.display());
        NgramModel::load(&cache_path)?
    } else {
        info!("training on {} sequences", train_data.len());
        let model = NgramModel::train(train_data, &config)?;
        model.save(&cache_path)?;
        model
    };

    // Total log-likelihood of the held-out names under the model
    info!(
        "held-out log-likelihood over {} sequences: {}",
        test_data.len(),
        model.log_likelihood(test_data)?
    );

    // Generate 10 names with the thread-local rng
    let mut rng = rand::rng();
    for i in 0..10 {
        println!("Generated name {}: {}", i + 1, model.generate(&mut rng)?);
    }

    Ok(())
}
