//! Prompt templates for the feedback service

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Prompt templates with `{resume}`, `{job}` and `{question}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub feedback: String,
    pub question: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            feedback: FEEDBACK_TEMPLATE.to_string(),
            question: QUESTION_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub resume_content: String,
    pub job_content: String,
}

impl PromptTemplates {
    pub fn render_feedback(&self, params: &PromptParams) -> String {
        render(&self.feedback, params, None)
    }

    pub fn render_question(&self, params: &PromptParams, question: &str) -> String {
        render(&self.question, params, Some(question))
    }
}

/// Fill placeholders in one pass, so inserted text is never re-expanded
fn render(template: &str, params: &PromptParams, question: Option<&str>) -> String {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let placeholder = PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{(resume|job|question)\}").expect("Invalid placeholder regex"));

    placeholder
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "resume" => params.resume_content.clone(),
            "job" => params.job_content.clone(),
            _ => match question {
                Some(question) => question.to_string(),
                None => caps[0].to_string(),
            },
        })
        .into_owned()
}

const FEEDBACK_TEMPLATE: &str = r#"You're a professional recruiter. Analyze the following resume and job description. Give feedback:
- How well does this resume match the job?
- Strengths?
- Weaknesses?
- What could improve?

Resume:
{resume}

Job Description:
{job}
"#;

const QUESTION_TEMPLATE: &str = r#"Given this resume and job description:

Resume:
{resume}

Job Description:
{job}

Answer this question: {question}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PromptParams {
        PromptParams {
            resume_content: "Rust engineer, 6 years".to_string(),
            job_content: "Backend developer wanted".to_string(),
        }
    }

    #[test]
    fn test_feedback_prompt_embeds_both_documents() {
        let prompt = PromptTemplates::default().render_feedback(&params());
        assert!(prompt.starts_with("You're a professional recruiter."));
        assert!(prompt.contains("Resume:\nRust engineer, 6 years"));
        assert!(prompt.contains("Job Description:\nBackend developer wanted"));
        assert!(!prompt.contains("{resume}"));
    }

    #[test]
    fn test_placeholders_in_documents_are_not_expanded() {
        let params = PromptParams {
            resume_content: "Templating with {job} and {question} tokens".to_string(),
            job_content: "JOB TEXT".to_string(),
        };
        let templates = PromptTemplates::default();

        let feedback = templates.render_feedback(&params);
        assert!(feedback.contains("Templating with {job} and {question} tokens"));
        assert_eq!(feedback.matches("JOB TEXT").count(), 1);

        let answer = templates.render_question(&params, "Why?");
        assert!(answer.contains("Templating with {job} and {question} tokens"));
        assert_eq!(answer.matches("Why?").count(), 1);
    }

    #[test]
    fn test_question_prompt() {
        let prompt = PromptTemplates::default().render_question(&params(), "Is {job} a fit?");
        assert!(prompt.contains("Answer this question: Is {job} a fit?"));
        assert!(prompt.contains("Rust engineer, 6 years"));
    }
}
