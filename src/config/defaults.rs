//! Default values for configuration

/// Default arXiv search keywords
pub fn default_keywords() -> Vec<String> {
    vec![
        "embodied ai".to_string(),
        "robot learning".to_string(),
        "dexterous manipulation".to_string(),
        "vision language action".to_string(),
    ]
}

/// Default cap on arXiv results per run
pub fn default_max_arxiv() -> usize {
    30
}

/// Default cap on GitHub results per topic
pub fn default_max_github() -> usize {
    10
}

/// Default GitHub topics to watch
pub fn default_github_topics() -> Vec<String> {
    vec![
        "robotics".to_string(),
        "embodied-ai".to_string(),
        "robot-learning".to_string(),
    ]
}

/// Default Hugging Face pipeline tasks to watch
pub fn default_hf_tasks() -> Vec<String> {
    vec!["robotics".to_string()]
}

/// Default high-interest scoring keywords (+3 per hit)
pub fn default_scoring_high() -> Vec<String> {
    vec![
        "vla".to_string(),
        "dexterous".to_string(),
        "humanoid".to_string(),
        "diffusion policy".to_string(),
    ]
}

/// Default medium-interest scoring keywords (+1 per hit)
pub fn default_scoring_medium() -> Vec<String> {
    vec![
        "manipulation".to_string(),
        "sim2real".to_string(),
        "imitation learning".to_string(),
        "reinforcement learning".to_string(),
    ]
}

/// Default LLM endpoint (OpenAI-compatible)
pub fn default_llm_base_url() -> String {
    "https://api.deepseek.com".to_string()
}

/// Default LLM model name
pub fn default_llm_model() -> String {
    "deepseek-chat".to_string()
}

/// Default SMTP port (STARTTLS)
pub fn default_smtp_port() -> u16 {
    587
}

/// Default arXiv API endpoint
pub fn default_arxiv_endpoint() -> String {
    "http://export.arxiv.org/api/query".to_string()
}

/// Default GitHub API endpoint
pub fn default_github_endpoint() -> String {
    "https://api.github.com".to_string()
}

/// Default Hugging Face hub endpoint
pub fn default_huggingface_endpoint() -> String {
    "https://huggingface.co".to_string()
}

/// Default per-attempt HTTP timeout in seconds
pub fn default_http_timeout_secs() -> u64 {
    10
}

/// Default base backoff delay in milliseconds
pub fn default_backoff_base_ms() -> u64 {
    500
}
