//! Prompt construction for cover letter generation.
//!
//! The template is fully deterministic: the same request always renders a
//! byte-identical prompt. No randomness, no timestamps.

use crate::generation::options::GenerationOptions;

/// Letter prompt template.
/// Replace: {word_band}, {tone_guidance}, {focus_line}, {resume_text},
///          {job_description}
const LETTER_PROMPT_TEMPLATE: &str = r#"You are a professional cover letter writer. Your task is to create a highly personalized cover letter that specifically matches the candidate's resume with the job requirements.

Guidelines:
- Length: {word_band} words
- Tone: {tone_guidance}
- Focus: {focus_line}

Resume Content (use this information to personalize the letter):
{resume_text}

Job Description:
{job_description}

Instructions:
1. Analyze the resume to extract specific skills, work experience, achievements, and education.
2. Analyze the job description to identify key requirements, responsibilities, and company values.
3. Create a personalized letter that directly references experiences from the resume, shows clear connections between past achievements and the job requirements, and demonstrates genuine interest in the role.

Format Requirements:
- Use "Hiring Manager" as the salutation
- Include a proper closing with "Sincerely," followed by a placeholder for the candidate's name
- Do not include the current date

Important: the cover letter must reference actual experiences and qualifications from the provided resume. Do not generate generic content.

Provide only the cover letter text without any additional commentary."#;

/// Renders the generation prompt for a trimmed resume, a trimmed job
/// description, and resolved style options.
pub fn build_prompt(resume_text: &str, job_description: &str, options: &GenerationOptions) -> String {
    LETTER_PROMPT_TEMPLATE
        .replace("{word_band}", options.length.word_band())
        .replace("{tone_guidance}", options.tone.guidance())
        .replace("{focus_line}", &options.focus_line())
        .replace("{resume_text}", resume_text)
        .replace("{job_description}", job_description)
}
