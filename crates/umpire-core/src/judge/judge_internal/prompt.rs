use crate::model::{RoundRequest, SessionState};

pub(crate) const SYSTEM_PROMPT: &str = "\
You are an AI Judge for a turn-based game called \"Rock–Paper–Scissors Plus\".
You are a neutral evaluator, not a player.
You judge user moves written in free-form natural language.
You must strictly follow the rules, handle ambiguity carefully,
track minimal state, and explain every decision.";

pub(crate) const INSTRUCTION_PROMPT: &str = "\
GAME RULES
1. Valid moves:
   - rock
   - paper
   - scissors
   - bomb (usable only once per player per game)

2. bomb beats rock, paper, and scissors.
3. bomb vs bomb results in a draw.
4. Ambiguous or unclear inputs → UNCLEAR.
5. INVALID or UNCLEAR moves waste the turn.
6. Using bomb again after it was already used → INVALID.

JUDGING PIPELINE (STRICT):

Step 1: Intent Understanding
- Infer intended move from user text.
- If intent is metaphorical, vague, or has multiple meanings → UNCLEAR.

Step 2: Validity Check
- Decide VALID / INVALID / UNCLEAR.
- Enforce bomb usage using provided state.

Step 3: Round Resolution
- Compare user move vs bot move.
- Decide:
  User | Bot | Draw | None

Step 4: Explanation
- Clearly explain interpretation, validity, and outcome.

OUTPUT FORMAT (STRICT JSON ONLY):

{
  \"round\": <number>,
  \"user_input\": \"<raw text>\",
  \"interpreted_user_move\": \"<rock | paper | scissors | bomb | null>\",
  \"bot_move\": \"<rock | paper | scissors | bomb>\",
  \"move_status\": \"<VALID | INVALID | UNCLEAR>\",
  \"round_winner\": \"<User | Bot | Draw | None>\",
  \"explanation\": \"<clear explanation>\",
  \"state_update\": {
    \"user_bomb_used\": <true | false>
  }
}

IMPORTANT:
- Do NOT guess intent.
- Do NOT invent rules.
- Do NOT add extra fields.";

// Booleans are spelled True/False in the state block; the rules text was tuned
// against that spelling.
fn flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

pub(crate) fn render_prompt_impl(state: &SessionState, request: &RoundRequest) -> String {
    format!(
        "{system}\n\n{instructions}\n\n\
         CURRENT GAME STATE\n\
         Round number: {round}\n\
         User bomb already used: {bomb}\n\
         Bot move: {bot_move}\n\n\
         USER INPUT:\n\
         \"{input}\"\n",
        system = SYSTEM_PROMPT,
        instructions = INSTRUCTION_PROMPT,
        round = state.round,
        bomb = flag(state.user_bomb_used),
        bot_move = request.bot_move,
        input = request.user_input,
    )
}
