//! Interactive selection of the source project and destination repository.

use std::io::{BufRead, Write};
use tracklift_migrate::{MigrationError, Project, Repository};

/// Something listed to the operator as `id : name`.
pub trait Listed {
    fn id(&self) -> u64;
    fn name(&self) -> &str;
}

impl Listed for Project {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Listed for Repository {
    fn id(&self) -> u64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Prints every item as `id : name`.
pub fn print_items<T: Listed>(out: &mut impl Write, items: &[T]) -> std::io::Result<()> {
    writeln!(out)?;
    for item in items {
        writeln!(out, "{} : {}", item.id(), item.name())?;
    }
    Ok(())
}

/// Finds the item whose ID is the decimal number in `input`.
pub fn find_by_id<'a, T: Listed>(items: &'a [T], input: &str) -> Result<&'a T, MigrationError> {
    let input = input.trim();
    input
        .parse::<u64>()
        .ok()
        .and_then(|id| items.iter().find(|item| item.id() == id))
        .ok_or_else(|| MigrationError::SelectionNotFound(input.to_string()))
}

/// Uses `preselected` when given, otherwise lists the items and reads an ID.
pub fn choose<'a, T: Listed>(
    items: &'a [T],
    preselected: Option<u64>,
    prompt: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<&'a T> {
    if let Some(id) = preselected {
        return Ok(find_by_id(items, &id.to_string())?);
    }

    print_items(out, items)?;
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(find_by_id(items, &line)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn projects() -> Vec<Project> {
        vec![
            Project {
                id: 3,
                name: "api".to_string(),
            },
            Project {
                id: 17,
                name: "web".to_string(),
            },
        ]
    }

    #[test]
    fn test_find_by_id() {
        let projects = projects();
        assert_eq!(find_by_id(&projects, "17\n").unwrap().name, "web");
        assert_eq!(find_by_id(&projects, " 3 ").unwrap().name, "api");
    }

    #[test]
    fn test_unknown_or_garbage_selection() {
        let projects = projects();
        assert!(matches!(
            find_by_id(&projects, "99"),
            Err(MigrationError::SelectionNotFound(ref s)) if s == "99"
        ));
        assert!(matches!(
            find_by_id(&projects, "web"),
            Err(MigrationError::SelectionNotFound(_))
        ));
        assert!(find_by_id::<Project>(&[], "").is_err());
    }

    #[test]
    fn test_choose_prompts_and_reads() {
        let projects = projects();
        let mut input = Cursor::new("3\n");
        let mut out = Vec::new();

        let chosen = choose(&projects, None, "Select: ", &mut input, &mut out).unwrap();
        assert_eq!(chosen.id, 3);

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("3 : api"));
        assert!(printed.contains("17 : web"));
        assert!(printed.ends_with("Select: "));
    }

    #[test]
    fn test_choose_preselected_skips_prompt() {
        let repos = vec![Repository {
            id: 8,
            name: "widgets".to_string(),
            owner: "acme".to_string(),
        }];
        let mut input = Cursor::new("");
        let mut out = Vec::new();

        let chosen = choose(&repos, Some(8), "Select: ", &mut input, &mut out).unwrap();
        assert_eq!(chosen.owner, "acme");
        assert!(out.is_empty());

        let err = choose(&repos, Some(9), "Select: ", &mut input, &mut out).unwrap_err();
        let err = err.downcast_ref::<MigrationError>().unwrap();
        assert_eq!(err.exit_code(), 1);
    }
}
