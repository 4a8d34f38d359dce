// Prompt constants for resume generation.

/// First line of every resume prompt. The formatter drops it from output.
pub const RESUME_INSTRUCTION: &str = "Write a resume. Follow this EXACT format:";

/// Resume prompt template.
/// Replace: {instruction}, {job_description}, {experience}
///
/// The filled template is also the fallback resume, so it must stay a complete
/// document on its own: one SUMMARY marker, four section headings.
pub const RESUME_PROMPT_TEMPLATE: &str = "{instruction}

SUMMARY
Experienced Senior Software Engineer with strong background in backend development and system architecture. Specializing in {job_description}. Proven track record of leading teams and delivering high-performance solutions.

EXPERIENCE
{experience}

SKILLS
1. Backend Development
2. System Architecture
3. Team Leadership
4. Cloud Computing
5. Performance Optimization

ACHIEVEMENTS
1. Led team of 5 engineers
2. Improved system performance by 40%
3. Implemented CI/CD pipeline";
