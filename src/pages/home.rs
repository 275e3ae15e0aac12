use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="page home-page">
            <h2>"About MediPredict"</h2>
            <p class="page-description">
                "Select the symptoms you are experiencing and get a ranked list of possible conditions, "
                "each with a likelihood, a short description and a recommendation."
            </p>

            <div class="card-grid">
                <div class="card">
                    <h3>"Check Symptoms"</h3>
                    <p>"Pick from common symptoms and run an analysis"</p>
                    <a href="/predict" class="btn btn-primary">"Start Now"</a>
                </div>
                <div class="card">
                    <h3>"Review History"</h3>
                    <p>"Every analysis is saved so you can look back at it later"</p>
                    <a href="/history" class="btn btn-primary">"View History"</a>
                </div>
            </div>

            <div class="how-it-works">
                <h3>"How It Works"</h3>
                <div class="steps">
                    <div class="step">
                        <span class="step-number">"1"</span>
                        <div class="step-content">
                            <strong>"Select"</strong>
                            <p>"Choose every symptom that applies to you"</p>
                        </div>
                    </div>
                    <div class="step">
                        <span class="step-number">"2"</span>
                        <div class="step-content">
                            <strong>"Analyze"</strong>
                            <p>"Symptom combinations are matched against known condition patterns"</p>
                        </div>
                    </div>
                    <div class="step">
                        <span class="step-number">"3"</span>
                        <div class="step-content">
                            <strong>"Review"</strong>
                            <p>"Read the likely conditions and what to do next"</p>
                        </div>
                    </div>
                </div>
            </div>

            <p class="disclaimer">
                "MediPredict is not a medical device and does not provide a diagnosis. "
                "Always consult a healthcare professional about your symptoms."
            </p>
        </div>
    }
}
