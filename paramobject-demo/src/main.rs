mod overrides;
mod shapes;

use clap::Parser;
use paramobject::{MissingPolicy, NestedBinding, Param, ParamError, ParamObject};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::overrides::{Assignment, env_overrides, parse_assignment};
use crate::shapes::Shape;

#[derive(Debug, Parser)]
#[command(about = "Build a parametrized shape and derive updated copies of it")]
struct Args {
    /// Shape to build
    #[arg(short, long, default_value = "hammer")]
    shape: Shape,
    /// Construction parameter, as NAME=VALUE (repeatable)
    #[arg(long = "set", value_parser = parse_assignment)]
    set: Vec<Assignment>,
    /// Update applied after construction, as PATH=VALUE (repeatable, dotted paths reach nested objects)
    #[arg(long = "with", value_parser = parse_assignment)]
    with: Vec<Assignment>,
    /// Report unset parameters at construction instead of on read
    #[arg(long)]
    eager: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false))
        .init();
}

/// Apply one update, walking nested bindings for dotted paths.
fn apply(object: &ParamObject, assignment: &Assignment) -> Result<ParamObject, ParamError> {
    let mut parents = assignment.parents().iter();
    let Some(first) = parents.next() else {
        return object.with_value(assignment.name(), assignment.value.clone());
    };

    let mut binding = nested(object.get(first)?, first)?;
    for field in parents {
        binding = nested(binding.get(field)?, field)?;
    }
    binding.with_value(assignment.name(), assignment.value.clone())
}

fn nested(param: Param, field: &str) -> Result<NestedBinding, ParamError> {
    param
        .into_nested()
        .ok_or_else(|| ParamError::custom(format!("'{field}' is not a nested object")))
}

fn print_object(object: &ParamObject) {
    println!("{object}");
    for (name, value) in object.params() {
        match value {
            Ok(value) => println!("  {name:<14} {value}"),
            Err(e) => println!("  {name:<14} <{e}>"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let args = Args::parse();

    let policy = if args.eager {
        MissingPolicy::Eager
    } else {
        MissingPolicy::Lazy
    };
    let class = args.shape.class(policy)?;
    tracing::info!("Building {} with {} missing policy", class.name(), policy);

    let mut params = env_overrides()?;
    for assignment in args.set {
        if !assignment.parents().is_empty() {
            return Err(format!(
                "--set does not accept nested paths, use --with for '{}'",
                assignment.path.join(".")
            )
            .into());
        }
        params.insert(assignment.name().to_string(), assignment.value);
    }

    let mut object = ParamObject::new(&class, params)?;
    print_object(&object);

    for assignment in &args.with {
        tracing::info!(
            "Updating {} = {}",
            assignment.path.join("."),
            assignment.value
        );
        object = apply(&object, assignment)?;
        print_object(&object);
    }

    Ok(())
}
