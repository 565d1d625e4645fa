use crate::utils::error::AppResult;

/// bcrypt blocks, so both calls run on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}

pub async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}
