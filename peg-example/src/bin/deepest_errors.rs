//! Deepest error reporting
//!
//! A small block language where the default reporter tends to blame the
//! outermost construct. Parsing with [`ReporterKind::Deepest`] points at
//! the failure that got furthest into the input instead.

use peg_framework::dsl::*;
use peg_framework::{rule, Atom, Grammar, ParseOptions, ReporterKind};
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

struct Blocks;

impl Blocks {
    // commons
    rule!(fn space() { re("[ \\t]").repeat(1) });
    rule!(fn space_opt() as "space?" { Self::space().maybe() });
    rule!(fn newline() { re("[\\r\\n]") });
    rule!(fn comment() { str("#") >> re("[^\\r\\n]").repeat(0) });
    rule!(fn line_separator() {
        (Self::space_opt() >> ((Self::comment().maybe() >> Self::newline()) | str(";")) >> Self::space_opt())
            .repeat(1)
    });
    rule!(fn identifier() { re("[a-zA-Z0-9_]").repeat(1) });

    // statements
    rule!(fn reference() {
        (str("@").repeat_range(1, 2) >> Self::identifier()).named("reference")
    });
    rule!(fn res_action_or_link() {
        str(".").named("dot") >> (Self::identifier() >> str("?").maybe()).named("name") >> str("()")
    });
    rule!(fn res_actions() {
        Self::reference().named("resources")
            >> Self::res_action_or_link()
                .named("res_action")
                .repeat(0)
                .named("res_actions")
    });
    rule!(fn res_statement() {
        Self::res_actions() >> (str(":") >> Self::identifier().named("name")).maybe().named("res_field")
    });
    rule!(fn expression() { Self::res_statement() });

    // blocks
    rule!(fn body() {
        (Self::line_separator() >> (Self::block() | Self::expression()))
            .repeat(1)
            .named("body")
            >> Self::line_separator()
    });
    rule!(fn begin_block() {
        (str("concurrent").named("type") >> Self::space()).maybe().named("pre")
            >> str("begin").named("begin")
            >> Self::body()
            >> str("end")
    });
    rule!(fn define_block() {
        str("define").named("define")
            >> Self::space()
            >> Self::identifier().named("name")
            >> str("()")
            >> Self::body()
            >> str("end")
    });
    rule!(fn block() { Self::define_block() | Self::begin_block() });
    rule!(fn radix() { Self::line_separator().maybe() >> Self::block() >> Self::line_separator().maybe() });
}

impl Grammar for Blocks {
    fn root(&self) -> Atom {
        Self::radix()
    }
}

/// Numbers the lines of `input` under a column ruler.
fn prettify(input: &str) -> String {
    let mut lines = vec![format!("{}.{}10{}.{}20", " ".repeat(7), " ".repeat(4), " ".repeat(3), " ".repeat(4))];
    for (idx, line) in input.lines().enumerate() {
        lines.push(format!("{:02} {}", idx + 1, line));
    }
    lines.join("\n")
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let level = std::env::var("PEG_LOG")
        .ok()
        .and_then(|value| value.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let inputs = [
        "define f()\n  @res.name\nend\n",
        "define f()\n  begin\n    @res.name\n  end\nend\n",
        "define f()\n@res.name()\nend\n",
    ];

    let deepest = ParseOptions::new().reporter(ReporterKind::Deepest);
    let contextual = ParseOptions::new();

    for input in inputs {
        println!("{}\n", prettify(input));

        println!("Default reporter:");
        if let Some(tree) = Blocks.parse_with_debug(input, &contextual) {
            println!("{:?}", tree);
            println!("{}", "-".repeat(60));
            continue;
        }

        println!("\nDeepest reporter:");
        if Blocks.parse_with_debug(input, &deepest).is_some() {
            warn!("input rejected by the default reporter was accepted");
        }
        println!("{}", "-".repeat(60));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use peg_framework::Tree;

    fn parse(atom: Atom, input: &str) -> Tree {
        match atom.parse(input) {
            Ok(tree) => tree,
            Err(err) => panic!("{}", err.ascii_tree()),
        }
    }

    fn action(name: &str) -> Tree {
        Tree::map([(
            "res_action",
            Tree::map([("dot", Tree::from(".")), ("name", Tree::from(name))]),
        )])
    }

    #[test]
    fn test_terminals() {
        assert_eq!(parse(Blocks::space(), " \t "), " \t ");
        assert_eq!(parse(Blocks::space_opt(), ""), "");
        assert_eq!(parse(Blocks::newline(), "\r"), "\r");
        assert_eq!(parse(Blocks::comment(), "#"), "#");
        assert_eq!(parse(Blocks::comment(), "# a comment"), "# a comment");
        assert_eq!(parse(Blocks::identifier(), "test_name1"), "test_name1");
        assert!(Blocks::identifier().parse("").is_err());
        assert!(Blocks::newline().parse("a").is_err());
    }

    #[test]
    fn test_references() {
        assert_eq!(
            parse(Blocks::reference(), "@@global"),
            Tree::map([("reference", Tree::from("@@global"))])
        );
        assert!(Blocks::reference().parse("res").is_err());
        assert!(Blocks::reference().parse("@@@res").is_err());
    }

    #[test]
    fn test_actions() {
        assert_eq!(parse(Blocks::res_action_or_link(), ".valid?()")["name"], "valid?");
        assert_eq!(
            parse(Blocks::res_actions(), "@res.name().valid?()"),
            Tree::map([
                ("resources", Tree::map([("reference", Tree::from("@res"))])),
                ("res_actions", Tree::seq([action("name"), action("valid?")])),
            ])
        );
    }

    #[test]
    fn test_statements() {
        assert_eq!(
            parse(Blocks::res_statement(), "@res"),
            Tree::map([
                ("resources", Tree::map([("reference", Tree::from("@res"))])),
                ("res_actions", Tree::Seq(vec![])),
                ("res_field", Tree::Nil),
            ])
        );
        assert_eq!(
            parse(Blocks::res_statement(), "@res.name():field")["res_field"],
            Tree::map([("name", Tree::from("field"))])
        );
    }

    #[test]
    fn test_blocks() {
        let tree = parse(Blocks::define_block(), "define f()\n@res.name()\nend");
        assert_eq!(tree["define"], "define");
        assert_eq!(tree["name"], "f");
        assert_eq!(tree["body"].as_seq().map(<[Tree]>::len), Some(1));

        let tree = parse(Blocks::begin_block(), "begin\n@res.name()\nend");
        assert!(tree["pre"].is_nil());
        assert_eq!(tree["begin"], "begin");

        let tree = parse(Blocks::begin_block(), "concurrent begin\n@res.name()\nend");
        assert_eq!(tree["pre"]["type"], "concurrent");
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        let deepest = ParseOptions::new().reporter(ReporterKind::Deepest);
        for input in [
            "define f()\n  @res.name\nend\n",
            "define f()\n  begin\n    @res.name\n  end\nend\n",
            "invalid syntax",
            "define f()",
            "begin",
        ] {
            assert!(Blocks.parse(input).is_err(), "{:?}", input);
            assert!(Blocks.parse_with(input, &deepest).is_err(), "{:?}", input);
        }
        assert!(Blocks.parse_with_debug("define f()\n@res.name()\nend\n", &deepest).is_some());
    }

    #[test]
    fn test_deepest_reporter_points_into_the_body() {
        let deepest = ParseOptions::new().reporter(ReporterKind::Deepest);
        let err = Blocks
            .parse_with("define f()\n  @res.name\nend\n", &deepest)
            .unwrap_err();
        let mut leaf = err.cause().clone();
        while let Some(child) = leaf.children().first().cloned() {
            leaf = child;
        }
        assert_eq!(leaf.line(), 2);
    }

    #[test]
    fn test_prettify() {
        let out = prettify("line 1\nline 2");
        assert!(out.contains("01 line 1"));
        assert!(out.contains("02 line 2"));
        assert!(prettify("").contains("10"));
    }
}
