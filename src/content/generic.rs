//! @acp:module "Generic Templates"
//! @acp:summary "Built-in per-language fallback projects"
//! @acp:domain cli
//! @acp:layer service
//!
//! Each template is a small key/value store demo parameterized by the project
//! title and the run date. Rendered with handlebars; `{{title}}` and `{{date}}`
//! are the only placeholders.

use handlebars::Handlebars;
use serde_json::json;

use super::ProjectFiles;

/// Language whose template serves unknown languages
pub const DEFAULT_LANGUAGE: &str = "python";

const PYTHON: &str = r#"#!/usr/bin/env python3
"""
{{title}}
Generated on {{date}} by the daily project generator
"""


def main():
    """Interactive key/value store for {{title}}"""
    print("=" * 50)
    print("  {{title}}")
    print("=" * 50)

    data = {}
    while True:
        print("\nOptions:")
        print("  1. Add item")
        print("  2. View items")
        print("  3. Remove item")
        print("  4. Exit")
        choice = input("\nSelect option: ").strip()

        if choice == "1":
            key = input("Enter key: ").strip()
            value = input("Enter value: ").strip()
            data[key] = value
            print(f"Added: {key} = {value}")
        elif choice == "2":
            if not data:
                print("No items yet.")
            for k, v in data.items():
                print(f"   {k}: {v}")
        elif choice == "3":
            key = input("Enter key to remove: ").strip()
            if data.pop(key, None) is None:
                print(f"Key '{key}' not found.")
            else:
                print(f"Removed: {key}")
        elif choice == "4":
            print("\nGoodbye!")
            break
        else:
            print("Invalid option.")


if __name__ == "__main__":
    main()
"#;

const JAVASCRIPT: &str = r#"/**
 * {{title}}
 * Generated on {{date}} by the daily project generator
 */

"use strict";

class MiniApp {
    constructor(name) {
        this.name = name;
        this.data = new Map();
        this.createdAt = new Date().toISOString();
    }

    add(key, value) {
        this.data.set(key, value);
        console.log(`Added: ${key} = ${value}`);
    }

    remove(key) {
        if (!this.data.delete(key)) {
            console.log(`Key '${key}' not found.`);
            return false;
        }
        console.log(`Removed: ${key}`);
        return true;
    }

    list() {
        if (this.data.size === 0) {
            console.log("No items yet.");
            return;
        }
        this.data.forEach((v, k) => console.log(`   ${k}: ${v}`));
    }

    stats() {
        return { name: this.name, itemCount: this.data.size, createdAt: this.createdAt };
    }
}

const app = new MiniApp("{{title}}");
console.log("=".repeat(50));
console.log("  {{title}}");
console.log("=".repeat(50));

app.add("project", "{{title}}");
app.add("language", "JavaScript");
app.add("date", "{{date}}");
app.list();
console.log("\nStats:", JSON.stringify(app.stats(), null, 2));
"#;

const JAVA: &str = r#"/**
 * {{title}}
 * Generated on {{date}} by the daily project generator
 */

import java.util.LinkedHashMap;
import java.util.Map;

public class Main {
    private final Map<String, String> data = new LinkedHashMap<>();
    private final String projectName;

    public Main(String name) {
        this.projectName = name;
    }

    public void add(String key, String value) {
        data.put(key, value);
        System.out.println("Added: " + key + " = " + value);
    }

    public boolean remove(String key) {
        if (data.remove(key) == null) {
            System.out.println("Key '" + key + "' not found.");
            return false;
        }
        System.out.println("Removed: " + key);
        return true;
    }

    public void list() {
        if (data.isEmpty()) {
            System.out.println("No items yet.");
            return;
        }
        for (Map.Entry<String, String> entry : data.entrySet()) {
            System.out.println("   " + entry.getKey() + ": " + entry.getValue());
        }
    }

    public static void main(String[] args) {
        System.out.println("=".repeat(50));
        System.out.println("  {{title}}");
        System.out.println("=".repeat(50));

        Main app = new Main("{{title}}");
        app.add("project", app.projectName);
        app.add("language", "Java");
        app.add("date", "{{date}}");
        app.list();
    }
}
"#;

const C: &str = r#"/*
 * {{title}}
 * Generated on {{date}} by the daily project generator
 */

#include <stdio.h>
#include <string.h>

#define MAX_ITEMS 100
#define MAX_LEN 256

typedef struct {
    char key[MAX_LEN];
    char value[MAX_LEN];
} Item;

typedef struct {
    Item items[MAX_ITEMS];
    int count;
} DataStore;

static int add_item(DataStore *store, const char *key, const char *value) {
    if (store->count >= MAX_ITEMS) {
        printf("Store is full!\n");
        return -1;
    }
    Item *item = &store->items[store->count++];
    snprintf(item->key, MAX_LEN, "%s", key);
    snprintf(item->value, MAX_LEN, "%s", value);
    printf("Added: %s = %s\n", key, value);
    return 0;
}

static void list_items(const DataStore *store) {
    if (store->count == 0) {
        printf("No items yet.\n");
        return;
    }
    for (int i = 0; i < store->count; i++) {
        printf("   %s: %s\n", store->items[i].key, store->items[i].value);
    }
}

int main(void) {
    DataStore store;
    memset(&store, 0, sizeof store);

    printf("==================================================\n");
    printf("  {{title}}\n");
    printf("==================================================\n");

    add_item(&store, "project", "{{title}}");
    add_item(&store, "language", "C");
    add_item(&store, "date", "{{date}}");
    list_items(&store);
    return 0;
}
"#;

const GO: &str = r#"/*
 * {{title}}
 * Generated on {{date}} by the daily project generator
 */

package main

import (
	"fmt"
	"sort"
	"strings"
)

type DataStore struct {
	Name  string
	Items map[string]string
}

func NewDataStore(name string) *DataStore {
	return &DataStore{Name: name, Items: make(map[string]string)}
}

func (ds *DataStore) Add(key, value string) {
	ds.Items[key] = value
	fmt.Printf("Added: %s = %s\n", key, value)
}

func (ds *DataStore) List() {
	if len(ds.Items) == 0 {
		fmt.Println("No items yet.")
		return
	}
	keys := make([]string, 0, len(ds.Items))
	for k := range ds.Items {
		keys = append(keys, k)
	}
	sort.Strings(keys)
	for _, k := range keys {
		fmt.Printf("   %s: %s\n", k, ds.Items[k])
	}
}

func main() {
	fmt.Println(strings.Repeat("=", 50))
	fmt.Println("  {{title}}")
	fmt.Println(strings.Repeat("=", 50))

	store := NewDataStore("{{title}}")
	store.Add("project", "{{title}}")
	store.Add("language", "Go")
	store.Add("date", "{{date}}")
	store.List()
}
"#;

/// (language, output file, template body)
const GENERIC_TEMPLATES: &[(&str, &str, &str)] = &[
    ("python", "main.py", PYTHON),
    ("javascript", "index.js", JAVASCRIPT),
    ("java", "Main.java", JAVA),
    ("c", "main.c", C),
    ("go", "main.go", GO),
];

/// @acp:summary "Render the generic project for a language"
///
/// Unknown languages get the Python template. A render failure (which would
/// mean a broken built-in template) falls back to the raw template body.
pub fn render(language: &str, title: &str, date: &str) -> ProjectFiles {
    let (_, file_name, body) = GENERIC_TEMPLATES
        .iter()
        .find(|(lang, _, _)| *lang == language)
        .or_else(|| {
            GENERIC_TEMPLATES
                .iter()
                .find(|(lang, _, _)| *lang == DEFAULT_LANGUAGE)
        })
        .copied()
        .unwrap_or(GENERIC_TEMPLATES[0]);

    let mut registry = Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);
    let content = registry
        .render_template(body, &json!({ "title": title, "date": date }))
        .unwrap_or_else(|e| {
            tracing::error!("Built-in {} template failed to render: {}", language, e);
            body.to_string()
        });

    let mut files = ProjectFiles::new();
    files.insert(file_name.to_string(), content);
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_renders_placeholders() {
        for (lang, file, _) in GENERIC_TEMPLATES {
            let files = render(lang, "Stack Array", "2024-01-10");
            let content = &files[*file];
            assert!(content.contains("Stack Array"), "{lang} missing title");
            assert!(content.contains("2024-01-10"), "{lang} missing date");
            assert!(!content.contains("{{"), "{lang} left a placeholder");
        }
    }

    #[test]
    fn test_unknown_language_uses_python() {
        let files = render("brainfuck", "Mini Project", "2024-01-10");
        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["main.py"]);
        assert!(files["main.py"].starts_with("#!/usr/bin/env python3"));
    }

    #[test]
    fn test_language_match_is_exact() {
        let files = render("GO", "Http Server", "2024-01-10");
        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["main.py"]);
    }

    #[test]
    fn test_language_code_braces_survive() {
        let files = render("javascript", "Quiz Game", "2024-01-10");
        assert!(files["index.js"].contains("console.log(`Added: ${key} = ${value}`);"));
    }
}
