//! Weft CLI
//!
//! Checks templates for syntax errors and prints their trees. Every call
//! resolves, so only the template structure is checked.

use std::io::IsTerminal;
use std::sync::Arc;

use weft::{
    init_tracing, report, CallableDescriptor, Capabilities, ColorMode, Node, Resolution,
    TemplateParser, TerminalEmitter, Value,
};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        print_usage();
        std::process::exit(2);
    }

    let mut parser = TemplateParser::new(|namespace: &str, identifier: &str| {
        Resolution::Resolved(Arc::new(
            CallableDescriptor::new(namespace, identifier)
                .with_capabilities(Capabilities::ARBITRARY_ARGUMENTS),
        ))
    });
    let mut color = ColorMode::Auto;
    for option in &args[3..] {
        if let Some(binding) = option.strip_prefix("--namespace=") {
            let Some((prefix, identifier)) = binding.split_once('=') else {
                eprintln!("error: expected --namespace=prefix=Identifier, got {option}");
                std::process::exit(2);
            };
            parser = parser.with_namespace(prefix, identifier);
        } else if let Some(mode) = option.strip_prefix("--color=") {
            color = match mode {
                "auto" => ColorMode::Auto,
                "always" => ColorMode::Always,
                "never" => ColorMode::Never,
                other => {
                    eprintln!("error: unknown color mode {other}");
                    std::process::exit(2);
                }
            };
        } else {
            eprintln!("error: unknown option {option}");
            std::process::exit(2);
        }
    }

    let path = &args[2];
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("error: cannot read {path}: {error}");
            std::process::exit(2);
        }
    };

    let template = match parser.parse(&source) {
        Ok(template) => template,
        Err(error) => {
            let mut emitter = TerminalEmitter::stderr(color, std::io::stderr().is_terminal());
            report(&error, &mut emitter);
            std::process::exit(1);
        }
    };

    match args[1].as_str() {
        "check" => {
            let mut calls = 0;
            template.root().walk(&mut |node: &Node| {
                if node.as_call().is_some() {
                    calls += 1;
                }
            });
            println!("{path}: ok ({calls} calls)");
            if let Some(layout) = template.layout_name() {
                println!("layout: {layout}");
            }
        }
        "tree" => print_tree(template.root(), 0),
        other => {
            eprintln!("error: unknown command {other}");
            print_usage();
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: weft <command> <template> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  check    Parse the template and report the first error");
    eprintln!("  tree     Print the parsed tree");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --namespace=<prefix>=<id>   Bind a namespace prefix");
    eprintln!("  --color=<mode>              auto, always or never");
    eprintln!();
    eprintln!("Set RUST_LOG=weft_parse=debug to trace parsing.");
}

fn print_tree(node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        Node::Root(children) => {
            println!("{indent}root");
            for child in children {
                print_tree(child, depth + 1);
            }
        }
        Node::Text(text) => println!("{indent}text {text:?}"),
        Node::ObjectAccessor(path) => println!("{indent}accessor {path}"),
        Node::Expression(expression) => {
            println!("{indent}expression {} {:?}", expression.name, expression.source);
        }
        Node::Array(array) => {
            println!("{indent}array");
            for (key, value) in array.iter() {
                print_value(&key.to_string(), value, depth + 1);
            }
        }
        Node::Call(call) => {
            println!("{indent}call {}", call.qualified_name());
            for (name, value) in &call.arguments {
                print_value(name, value, depth + 1);
            }
            for child in &call.children {
                print_tree(child, depth + 1);
            }
        }
    }
}

fn print_value(key: &str, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::String(text) => println!("{indent}{key} = {text:?}"),
        Value::Integer(number) => println!("{indent}{key} = {number}"),
        Value::Float(number) => println!("{indent}{key} = {number}"),
        Value::Node(node) => {
            println!("{indent}{key} =");
            print_tree(node, depth + 1);
        }
    }
}
