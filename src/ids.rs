use uuid::Uuid;

use crate::models::TaskCollection;

pub const ID_LEN: usize = 3;

/// Random short id not yet used in `tasks`.
pub fn next_id(tasks: &TaskCollection) -> String {
    next_id_with(tasks, random_id)
}

/// Keeps drawing from `generate` until it yields an id not present in `tasks`.
pub fn next_id_with(tasks: &TaskCollection, mut generate: impl FnMut() -> String) -> String {
    loop {
        let candidate = generate();
        if !tasks.contains(&candidate) {
            return candidate;
        }
        log::debug!("task id collision id={candidate}, retrying");
    }
}

fn random_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(ID_LEN);
    id
}
