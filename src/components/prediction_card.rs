use leptos::prelude::*;

use crate::commands::Prediction;
use crate::format::probability_class;

#[component]
pub fn PredictionCard(prediction: Prediction) -> impl IntoView {
    let band = probability_class(prediction.probability);
    let width = format!("width: {}%", prediction.probability);

    view! {
        <div class=format!("prediction-card {}", band)>
            <div class="prediction-header">
                <h3 class="prediction-condition">{prediction.condition}</h3>
                <span class="prediction-probability">{format!("{}%", prediction.probability)}</span>
            </div>
            <div class="probability-bar">
                <div class="probability-fill" style=width></div>
            </div>
            <p class="prediction-description">{prediction.description}</p>
            <div class="prediction-recommendation">
                <strong>"Recommendation: "</strong>
                {prediction.recommendation}
            </div>
        </div>
    }
}
