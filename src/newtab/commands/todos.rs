use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NewtabError, Result};
use crate::store::{DataStore, Record, StoreKey};
use crate::todos::{restore_todos, Todo, TodoFilter, TodoId};
use log::{info, warn};
use serde_json::Value;

pub fn load_todos<S: DataStore>(store: &S) -> Result<Vec<Todo>> {
    let record = store.get(&[StoreKey::Todos])?;
    let raw: &[Value] = match record.get(StoreKey::Todos.as_str()) {
        Some(Value::Array(list)) => list.as_slice(),
        Some(other) => {
            warn!("stored todos are not a list ({}), ignoring", other);
            &[]
        }
        None => &[],
    };
    let (todos, malformed) = restore_todos(raw);
    if malformed > 0 {
        warn!("dropped {} unreadable stored todos", malformed);
    }
    Ok(todos)
}

/// The `todos` key as it is written to the store.
pub fn todos_record(todos: &[Todo]) -> Result<Record> {
    let mut record = Record::new();
    record.insert(
        StoreKey::Todos.as_str().to_string(),
        serde_json::to_value(todos)?,
    );
    Ok(record)
}

fn commit<S: DataStore>(store: &mut S, todos: &mut Vec<Todo>, next: Vec<Todo>) -> Result<()> {
    store.set(todos_record(&next)?)?;
    *todos = next;
    info!("saved {} todos", todos.len());
    Ok(())
}

/// Finds the one todo whose id is `id` or starts with `id`.
pub fn resolve_id(todos: &[Todo], id: &str) -> Result<TodoId> {
    let id = id.trim();
    if id.is_empty() {
        return Err(NewtabError::Contract("Todo id cannot be empty".to_string()));
    }
    if let Some(exact) = todos.iter().find(|t| t.id.as_str() == id) {
        return Ok(exact.id.clone());
    }
    let mut matches = todos.iter().filter(|t| t.id.as_str().starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(only.id.clone()),
        (Some(_), Some(_)) => Err(NewtabError::Contract(format!(
            "Id prefix {} matches more than one todo",
            id
        ))),
        (None, _) => Err(NewtabError::TodoNotFound(id.to_string())),
    }
}

fn position(todos: &[Todo], id: &TodoId) -> Result<usize> {
    todos
        .iter()
        .position(|t| &t.id == id)
        .ok_or_else(|| NewtabError::TodoNotFound(id.to_string()))
}

fn todo_text(raw: &str) -> Result<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(NewtabError::Contract("Todo text cannot be empty".to_string()));
    }
    Ok(text.to_string())
}

pub fn add<S: DataStore>(store: &mut S, todos: &mut Vec<Todo>, text: &str) -> Result<CmdResult> {
    let todo = Todo::new(todo_text(text)?);
    let mut next = todos.clone();
    next.push(todo.clone());
    commit(store, todos, next)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Todo added ({}): {}",
        todo.id.short(),
        todo.text
    )));
    Ok(result.with_todos(vec![todo]))
}

/// Flips a todo between open and done.
pub fn toggle<S: DataStore>(store: &mut S, todos: &mut Vec<Todo>, id: &TodoId) -> Result<CmdResult> {
    let idx = position(todos, id)?;
    let mut next = todos.clone();
    next[idx].completed = !next[idx].completed;
    let todo = next[idx].clone();
    commit(store, todos, next)?;

    let mut result = CmdResult::default();
    let state = if todo.completed { "done" } else { "open" };
    result.add_message(CmdMessage::success(format!(
        "Todo marked {}: {}",
        state, todo.text
    )));
    Ok(result.with_todos(vec![todo]))
}

pub fn update<S: DataStore>(
    store: &mut S,
    todos: &mut Vec<Todo>,
    id: &TodoId,
    text: &str,
) -> Result<CmdResult> {
    let idx = position(todos, id)?;
    let mut next = todos.clone();
    next[idx].text = todo_text(text)?;
    let todo = next[idx].clone();
    commit(store, todos, next)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Todo updated: {}", todo.text)));
    Ok(result.with_todos(vec![todo]))
}

pub fn delete<S: DataStore>(store: &mut S, todos: &mut Vec<Todo>, id: &TodoId) -> Result<CmdResult> {
    let idx = position(todos, id)?;
    let mut next = todos.clone();
    let removed = next.remove(idx);
    commit(store, todos, next)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Todo deleted: {}", removed.text)));
    Ok(result.with_todos(vec![removed]))
}

pub fn list(todos: &[Todo], filter: TodoFilter) -> Result<CmdResult> {
    let listed = todos.iter().filter(|t| filter.matches(t)).cloned().collect();
    Ok(CmdResult::default().with_todos(listed))
}

/// Removes every done todo. Nothing is written when none are done.
pub fn clear_completed<S: DataStore>(store: &mut S, todos: &mut Vec<Todo>) -> Result<CmdResult> {
    let next: Vec<Todo> = todos.iter().filter(|t| !t.completed).cloned().collect();
    let removed = todos.len() - next.len();

    let mut result = CmdResult::default();
    if removed == 0 {
        result.add_message(CmdMessage::info("No completed todos"));
        return Ok(result);
    }
    commit(store, todos, next)?;
    result.add_message(CmdMessage::success(format!(
        "Cleared {} completed todo(s)",
        removed
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use serde_json::json;

    fn seeded() -> (InMemoryStore, Vec<Todo>) {
        let store = StoreFixture::new()
            .with_todos(json!([
                {"id": "t-1", "text": "water plants", "completed": false},
                {"id": "t-2", "text": "pay rent", "completed": true},
                {"id": "u-3", "text": "call mum", "completed": true}
            ]))
            .build();
        let todos = load_todos(&store).unwrap();
        (store, todos)
    }

    #[test]
    fn add_persists_an_open_todo() {
        let mut store = InMemoryStore::new();
        let mut todos = load_todos(&store).unwrap();
        assert!(todos.is_empty());

        let result = add(&mut store, &mut todos, "  buy milk ").unwrap();
        assert_eq!(result.todos[0].text, "buy milk");
        assert!(!todos[0].completed);
        assert_eq!(load_todos(&store).unwrap(), todos);

        assert!(matches!(
            add(&mut store, &mut todos, "   "),
            Err(NewtabError::Contract(_))
        ));
        assert_eq!(todos.len(), 1);
    }

    #[test]
    fn toggle_update_and_delete() {
        let (mut store, mut todos) = seeded();

        toggle(&mut store, &mut todos, &"t-1".into()).unwrap();
        assert!(todos[0].completed);
        toggle(&mut store, &mut todos, &"t-1".into()).unwrap();
        assert!(!todos[0].completed);

        update(&mut store, &mut todos, &"t-2".into(), "pay rent today").unwrap();
        assert_eq!(todos[1].text, "pay rent today");

        delete(&mut store, &mut todos, &"u-3".into()).unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(load_todos(&store).unwrap(), todos);

        assert!(matches!(
            toggle(&mut store, &mut todos, &"nope".into()),
            Err(NewtabError::TodoNotFound(_))
        ));
    }

    #[test]
    fn views_and_clear_completed() {
        let (mut store, mut todos) = seeded();

        let active = list(&todos, TodoFilter::Active).unwrap().todos;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id.as_str(), "t-1");
        assert_eq!(list(&todos, TodoFilter::Completed).unwrap().todos.len(), 2);
        assert_eq!(list(&todos, TodoFilter::All).unwrap().todos.len(), 3);

        clear_completed(&mut store, &mut todos).unwrap();
        assert_eq!(todos.len(), 1);
        let writes = store.writes();
        let result = clear_completed(&mut store, &mut todos).unwrap();
        assert_eq!(store.writes(), writes);
        assert_eq!(result.messages[0].content, "No completed todos");
    }

    #[test]
    fn id_prefixes() {
        let (_, todos) = seeded();
        assert_eq!(resolve_id(&todos, "u").unwrap().as_str(), "u-3");
        assert!(matches!(resolve_id(&todos, "t"), Err(NewtabError::Contract(_))));
        assert!(matches!(
            resolve_id(&todos, "z"),
            Err(NewtabError::TodoNotFound(_))
        ));
    }

    #[test]
    fn failed_write_keeps_the_list() {
        let (mut store, mut todos) = seeded();
        let before = todos.clone();

        store.set_simulate_write_error(true);
        assert!(add(&mut store, &mut todos, "new").is_err());
        assert!(toggle(&mut store, &mut todos, &"t-1".into()).is_err());
        assert!(delete(&mut store, &mut todos, &"t-2".into()).is_err());
        assert!(clear_completed(&mut store, &mut todos).is_err());
        assert_eq!(todos, before);
    }
}
