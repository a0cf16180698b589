//! Prompts for question decomposition, grounded answering and claim judging

/// System prompt for decomposing a legal question into sub-questions
pub const DECOMPOSITION_SYSTEM_PROMPT: &str = r#"You are a legal analyst specialized in Spanish Intellectual Property law. Your task is to decompose a legal question into sub-questions that test compliance with the cited legal excerpts.

## Critical Rules

1. **Every sub-question must be answerable against the cited excerpts.**
   - Do NOT invent rules, statutes or doctrines that are not present in the excerpts.
   - If the excerpts are marked as missing, keep the sub-questions general and do not cite any source.

2. **Sub-questions probe compliance, not curiosity.**
   - Each one should isolate a single requirement, exception or condition relevant to the parent question.
   - Prefer concrete, verifiable formulations over broad thematic ones.

3. **Write the sub-questions in Spanish**, in the register of a legal practitioner.

## Output Requirements

- Return exactly the requested number of sub-questions, as a structured list of plain question strings.
- No numbering, no commentary, no answers."#;

/// Build the decomposition prompt for one node
pub fn build_decomposition_prompt(
    question: &str,
    grounding: &str,
    width: usize,
    concepts: &[String],
) -> String {
    let concept_line = if concepts.is_empty() {
        String::new()
    } else {
        format!("\n## Key Concepts Detected\n\n{}\n", concepts.join(", "))
    };

    format!(
        r#"Decompose the following legal question into exactly {width} sub-questions that test compliance with the cited excerpts.

## Question

{question}
{concept_line}
## Cited Excerpts

{grounding}

---

Return exactly {width} sub-question strings. Do not invent rules absent from the excerpts."#
    )
}

/// System prompt for answering a question using only retrieved excerpts
pub const GROUNDED_ANSWER_SYSTEM_PROMPT: &str = r#"You are a legal assistant specialized in Spanish Intellectual Property law.

Answer using EXCLUSIVELY the excerpts provided in the prompt. Do not add outside information, case law or statutes that are not in the excerpts. If the excerpts are insufficient to answer, state that explicitly instead of completing the answer from general knowledge.

Answer in Spanish, in clear and technical prose."#;

/// Build the grounded-answer prompt for one node
pub fn build_grounded_answer_prompt(question: &str, grounding: &str) -> String {
    format!(
        r#"Answer the following question using exclusively the excerpts below.

## Question

{question}

## Excerpts

{grounding}

---

If the excerpts do not contain enough information, say so explicitly."#
    )
}

/// System prompt for the ungrounded fallback answer
pub const FALLBACK_ANSWER_SYSTEM_PROMPT: &str = r#"You are a legal assistant specialized in Spanish Intellectual Property law.

No corpus excerpts are available for this question. Answer from your general knowledge of the domain, clearly, technically and concisely, in Spanish. Do not fabricate citations to specific statutes or rulings."#;

/// Build the fallback prompt for one node
pub fn build_fallback_prompt(question: &str) -> String {
    format!(
        r#"Answer the following question from general domain knowledge.

## Question

{question}"#
    )
}

/// System prompt for judging whether a claim is supported by evidence
pub const JUDGE_SYSTEM_PROMPT: &str = r#"You are a strict legal reviewer. You judge whether a generated claim is supported by a given piece of evidence text, and nothing else.

## Labels

- "validated": the claim is fully and directly supported by the evidence text.
- "partial": the claim is a defensible inference from the evidence, but not explicit in it.
- "not_validated": the claim asserts content absent from, or contradicting, the evidence.

## Critical Rules

1. Judge ONLY against the evidence text. The claim's own fluency or plausibility is irrelevant.
2. When in doubt between two labels, pick the stricter one.
3. The justification must be a direct, factual statement in one or two sentences - no meta-commentary such as "this excerpt suggests".

Return exactly one of the three labels."#;

/// Build the judging prompt for one (claim, evidence) pair
pub fn build_judge_prompt(claim: &str, evidence: &str) -> String {
    format!(
        r#"Classify the following claim strictly against the evidence.

## Claim

{claim}

## Evidence

{evidence}

---

Return structured JSON with:
- status: validated | partial | not_validated
- justification: direct, factual explanation (no meta-commentary)"#
    )
}
