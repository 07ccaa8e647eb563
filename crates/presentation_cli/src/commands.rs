//! Command handlers

use anyhow::{Context, anyhow};
use domain::{Address, PostalCode};
use infrastructure::Services;
use tracing::debug;

use crate::cli::{
    AddressArgs, Commands, EndpointCommand, RouteCommand, StudentsCommand, going_flag,
};
use crate::render;

/// Which end of the route an endpoint command targets
#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    const fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::End => "End",
        }
    }
}

/// Dispatch a parsed command
pub async fn run(command: Commands, services: &Services) -> anyhow::Result<()> {
    match command {
        Commands::Start(cmd) => endpoint(Endpoint::Start, cmd, services).await,
        Commands::End(cmd) => endpoint(Endpoint::End, cmd, services).await,
        Commands::Students(cmd) => students(cmd, services).await,
        Commands::Cep { code } => cep(&code, services).await,
        Commands::Route(cmd) => route(cmd, services).await,
    }
}

async fn endpoint(
    which: Endpoint,
    command: EndpointCommand,
    services: &Services,
) -> anyhow::Result<()> {
    match command {
        EndpointCommand::Set(args) => {
            let address = resolve_address(&args, services).await?;
            let line = render::address(&address);
            match which {
                Endpoint::Start => services.state.set_start(address).await?,
                Endpoint::End => services.state.set_end(address).await?,
            }
            println!("✅ {} set: {line}", which.label());
        },
        EndpointCommand::Show => {
            let current = match which {
                Endpoint::Start => services.state.start(),
                Endpoint::End => services.state.end(),
            };
            match current {
                Some(address) => println!("{}: {}", which.label(), render::address(&address)),
                None => println!("{} not set", which.label()),
            }
        },
    }
    Ok(())
}

async fn students(command: StudentsCommand, services: &Services) -> anyhow::Result<()> {
    match command {
        StudentsCommand::List => {
            let students = services.roster.list().await?;
            if students.is_empty() {
                println!("No students enrolled");
            }
            for student in &students {
                println!("{}", render::student(student));
            }
        },
        StudentsCommand::Add {
            name,
            phone,
            address,
        } => {
            let address = resolve_address(&address, services).await?;
            let student = services.roster.add(&name, &phone, address).await?;
            println!("✅ Enrolled {} (id {})", student.name, student.id);
        },
        StudentsCommand::Going { id, on, off } => {
            let going = services.roster.set_going(id, going_flag(on, off)).await?;
            let state = if going { "going" } else { "not going" };
            println!("Student {id} is {state}");
        },
        StudentsCommand::Remove { id } => {
            let removed = services.roster.remove(id).await?;
            println!("🗑️  Removed {}", removed.name);
        },
    }
    Ok(())
}

async fn cep(code: &str, services: &Services) -> anyhow::Result<()> {
    match services.autofill.lookup(code).await? {
        Some(found) => println!("{}", render::postal_address(&found)),
        None => println!("Lookup cancelled"),
    }
    Ok(())
}

async fn route(command: RouteCommand, services: &Services) -> anyhow::Result<()> {
    match command {
        RouteCommand::Compute => {
            let students = services.roster.list().await?;
            println!("🗺️  Computing route...");
            let itinerary = services.route.compute(&students).await?;
            println!("{}", render::itinerary(&itinerary));
        },
        RouteCommand::Show { json } => match services.state.current_itinerary() {
            Some(itinerary) if json => {
                println!("{}", serde_json::to_string_pretty(&*itinerary)?);
            },
            Some(itinerary) => println!("{}", render::itinerary(&itinerary)),
            None => println!("No itinerary computed yet"),
        },
        RouteCommand::Clear => {
            services.state.clear_itinerary().await?;
            println!("Itinerary cleared");
        },
        RouteCommand::Navigate => match services.state.current_itinerary() {
            Some(itinerary) => println!("{}", itinerary.navigation_url()),
            None => println!("No itinerary computed yet"),
        },
    }
    Ok(())
}

/// Build an address from the flags, filling gaps from the postal code
async fn resolve_address(args: &AddressArgs, services: &Services) -> anyhow::Result<Address> {
    let mut address = match args.postal_code.as_deref() {
        Some(code) if args.needs_autofill() => {
            debug!(%code, "Filling address from postal code");
            services
                .autofill
                .autofill(code, &args.number)
                .await
                .with_context(|| format!("postal code {code}"))?
                .ok_or_else(|| anyhow!("postal code lookup was cancelled"))?
        },
        _ => Address::new(
            args.street.clone().unwrap_or_default(),
            args.number.clone(),
            args.city.clone().unwrap_or_default(),
        ),
    };

    apply_overrides(&mut address, args)?;
    address.validate()?;
    Ok(address)
}

/// Explicit flags win over autofilled values
fn apply_overrides(address: &mut Address, args: &AddressArgs) -> anyhow::Result<()> {
    if let Some(street) = &args.street {
        address.street.clone_from(street);
    }
    if let Some(city) = &args.city {
        address.city.clone_from(city);
    }
    if args.neighborhood.is_some() {
        address.neighborhood.clone_from(&args.neighborhood);
    }
    if args.state.is_some() {
        address.state.clone_from(&args.state);
    }
    if let Some(code) = args.postal_code.as_deref() {
        address.postal_code = Some(PostalCode::parse(code)?.digits().to_string());
    }
    Ok(())
}
