use crate::errors::JudgeError;
use crate::judge::Judge;
use crate::model::Verdict;

pub(crate) async fn call_judge_impl(judge: &Judge, prompt: &str) -> Result<String, JudgeError> {
    let resp = judge
        .client
        .complete(prompt, &judge.generation)
        .await
        .map_err(|e| JudgeError::provider(judge.client.provider_name(), e))?;
    Ok(resp.text)
}

/// Text -> verdict. The whole reply must be one JSON document; nothing is
/// salvaged from partial or wrapped output.
pub(crate) fn parse_verdict_impl(text: &str) -> Result<Verdict, JudgeError> {
    let val: serde_json::Value = serde_json::from_str(text.trim())
        .map_err(|e| JudgeError::malformed(e.to_string(), text))?;

    let Some(obj) = val.as_object() else {
        return Err(JudgeError::incomplete("verdict must be a JSON object", val));
    };

    match obj.get("state_update") {
        None => {
            return Err(JudgeError::incomplete(
                "verdict is missing `state_update`",
                val,
            ))
        }
        Some(update) if update.get("user_bomb_used").and_then(|v| v.as_bool()).is_none() => {
            return Err(JudgeError::incomplete(
                "`state_update.user_bomb_used` must be a boolean",
                val,
            ))
        }
        Some(_) => {}
    }

    serde_json::from_value::<Verdict>(val.clone())
        .map_err(|e| JudgeError::incomplete(e.to_string(), val))
}
