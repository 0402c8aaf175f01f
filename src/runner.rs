use log::debug;

use crate::client::CompletionClient;
use crate::prompt::ResolvedPrompt;
use crate::record::ModelResult;

/// Drives one run: invokes the completion client once per requested
/// model, strictly sequentially, in list order.
pub struct ProbeRunner {
    client: CompletionClient,
    models: Vec<String>,
    prompt: ResolvedPrompt,
}

impl ProbeRunner {
    pub fn new(client: CompletionClient, models: Vec<String>, prompt: ResolvedPrompt) -> Self {
        Self {
            client,
            models,
            prompt,
        }
    }

    pub fn prompt(&self) -> &ResolvedPrompt {
        &self.prompt
    }

    /// Query every model and collect the outcomes.
    ///
    /// A failing model is recorded as a result whose response holds the
    /// error text, with cost and time zeroed; the remaining models still
    /// run. The returned sequence always has one entry per requested
    /// model, in request order.
    pub async fn run(&self) -> Vec<ModelResult> {
        let mut results = Vec::with_capacity(self.models.len());

        for model in &self.models {
            debug!("querying {}", model);

            match self
                .client
                .complete(
                    model,
                    &self.prompt.user_prompt,
                    self.prompt.system_prompt.as_deref(),
                )
                .await
            {
                Ok(completion) => {
                    let total_time = completion.elapsed.as_secs_f64();
                    println!("Model: {}", model);
                    println!("Response:\n{}", completion.text);
                    println!("Cost: {:.4} USD", completion.cost);
                    println!("Total time: {:.4} seconds", total_time);
                    println!("\n\n{}\n\n", "-".repeat(100));

                    results.push(ModelResult {
                        model: model.clone(),
                        response: completion.text,
                        cost: completion.cost,
                        total_time,
                        prompt: self.prompt.key.clone(),
                    });
                }
                Err(e) => {
                    println!("Error with model {}: {}", model, e);

                    results.push(ModelResult {
                        model: model.clone(),
                        response: e.to_string(),
                        cost: 0.0,
                        total_time: 0.0,
                        prompt: self.prompt.key.clone(),
                    });
                }
            }
        }

        results
    }
}
