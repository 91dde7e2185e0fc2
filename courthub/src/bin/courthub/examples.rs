use crate::commands::{promote, reconcile, serve};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "serve",
            groups: serve::EXAMPLES,
        },
        CommandExample {
            name: "promote",
            groups: promote::EXAMPLES,
        },
        CommandExample {
            name: "reconcile",
            groups: reconcile::EXAMPLES,
        },
    ]
}
