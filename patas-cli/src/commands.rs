use std::fs;
use std::path::Path;

use eyre::{eyre, Result, WrapErr};
use patas_core::viewmodel::{
    AnimalCard, AnimalDetails, AnimalDetailsViewModel, AnimalForm, AuthViewModel,
    CreateAnimalViewModel, EditAnimalViewModel, FeedViewModel, NewAnimalForm, ProfileView,
    ProfileViewModel, RegisterForm, UiState,
};
use patas_core::{AppContext, GeoPoint, Identity};

use crate::cli::{AnimalCommands, Commands, Location, ProfileCommands, RegisterArgs};

/// Finished view-model state as a result.
fn outcome<T>(state: UiState<T>) -> Result<T> {
    match state {
        UiState::Success(value) => Ok(value),
        UiState::Error(message) => Err(eyre!(message)),
        UiState::Idle | UiState::Loading => Err(eyre!("request did not complete")),
    }
}

fn read_photo(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).wrap_err_with(|| format!("failed to read photo {}", path.display()))
}

const fn point(at: Location) -> GeoPoint {
    GeoPoint {
        latitude: at.lat,
        longitude: at.long,
    }
}

pub async fn run(ctx: AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Login { email, password } => login(ctx, &email, &password).await,
        Commands::Register(args) => register(ctx, args).await,
        Commands::Logout => {
            let route = AuthViewModel::new(ctx.clone()).logout();
            if ctx.session().is_logged_in() {
                return Err(eyre!("could not remove the saved session"));
            }
            tracing::debug!("next screen: {route}");
            println!("Logged out.");
            Ok(())
        }
        Commands::Whoami => {
            match ctx.session().current_identity() {
                Some(identity) => print_identity(&identity),
                None => println!("Not logged in."),
            }
            Ok(())
        }
        Commands::Feed { at } => feed(ctx, at).await,
        Commands::Animal { action } => animal(ctx, action).await,
        Commands::Profile { action } => profile(ctx, action).await,
    }
}

async fn login(ctx: AppContext, email: &str, password: &str) -> Result<()> {
    let vm = AuthViewModel::new(ctx);
    vm.login(email, password).await;
    let identity = outcome(vm.login_state().get())?;
    println!("Logged in.");
    print_identity(&identity);
    Ok(())
}

async fn register(ctx: AppContext, args: RegisterArgs) -> Result<()> {
    let vm = AuthViewModel::new(ctx);
    vm.register(RegisterForm {
        name: args.name,
        email: args.email,
        confirm_password: args.password.clone(),
        password: args.password,
        city: args.city,
        state: args.state,
        phone: args.phone,
    })
    .await;
    outcome(vm.register_state().get())?;
    println!("Account created. Log in with `patas login`.");
    Ok(())
}

async fn feed(ctx: AppContext, at: Location) -> Result<()> {
    let vm = FeedViewModel::new(ctx);
    vm.fetch_nearby(at.lat, at.long).await;
    let cards = outcome(vm.state().get())?;
    if cards.is_empty() {
        println!("No animals nearby.");
    }
    for card in &cards {
        println!("{}", card_line(card));
    }
    Ok(())
}

fn card_line(card: &AnimalCard) -> String {
    format!(
        "#{:<5} {:<20} {:>9}  {} / {}",
        card.id, card.name, card.distance, card.status, card.sex
    )
}

async fn animal(ctx: AppContext, action: AnimalCommands) -> Result<()> {
    match action {
        AnimalCommands::Show { id, lat, long } => {
            let vm = AnimalDetailsViewModel::new(ctx);
            let location = lat.zip(long).map(|(lat, long)| GeoPoint {
                latitude: lat,
                longitude: long,
            });
            vm.load(id, location).await;
            let details = outcome(vm.state().get())?;
            print_details(&details, vm.is_owner());
        }
        AnimalCommands::Create {
            name,
            description,
            photos,
            at,
        } => {
            let photos = photos
                .iter()
                .map(|path| read_photo(path))
                .collect::<Result<Vec<_>>>()?;
            let vm = CreateAnimalViewModel::new(ctx);
            vm.create(NewAnimalForm {
                name,
                description,
                photos,
                location: point(at),
            })
            .await;
            outcome(vm.state().get())?;
            println!("Animal reported.");
        }
        AnimalCommands::Edit {
            id,
            name,
            description,
            age,
            status,
            size,
            sex,
            photo,
        } => {
            let vm = EditAnimalViewModel::new(ctx);
            vm.load(id).await;
            let loaded = outcome(vm.form_state().get())?;
            let form = AnimalForm {
                name: name.unwrap_or(loaded.name),
                description: description.unwrap_or(loaded.description),
                approximate_age: age.unwrap_or(loaded.approximate_age),
                status: status.unwrap_or(loaded.status),
                size: size.unwrap_or(loaded.size),
                sex: sex.unwrap_or(loaded.sex),
                new_photo: photo.as_deref().map(read_photo).transpose()?,
                ..loaded
            };
            vm.save(form).await;
            outcome(vm.save_state().get())?;
            println!("Animal {id} updated.");
        }
        AnimalCommands::Delete { id } => {
            let vm = AnimalDetailsViewModel::new(ctx);
            vm.load(id, None).await;
            outcome(vm.state().get())?;
            vm.delete().await;
            outcome(vm.delete_state().get())?;
            println!("Animal {id} deleted.");
        }
    }
    Ok(())
}

async fn profile(ctx: AppContext, action: ProfileCommands) -> Result<()> {
    let vm = ProfileViewModel::new(ctx);
    match action {
        ProfileCommands::Show => vm.load().await,
        ProfileCommands::SetPhoto { path } => {
            vm.update_photo(&read_photo(&path)?).await;
            println!("{}", outcome(vm.photo_state().get())?);
        }
        ProfileCommands::DeletePhoto => {
            vm.delete_photo().await;
            println!("{}", outcome(vm.photo_state().get())?);
        }
    }
    print_profile(&outcome(vm.state().get())?);
    Ok(())
}

fn print_identity(identity: &Identity) {
    println!("{} <{}>", identity.name, identity.email);
    println!("  id:   {}", identity.id);
    println!("  type: {}", identity.user_type);
}

fn print_details(details: &AnimalDetails, is_owner: bool) {
    let animal = &details.animal;
    println!("#{} {}", animal.id, animal.provisional_name);
    println!("  status:   {}", details.status);
    println!("  sex:      {}", details.sex);
    println!("  distance: {}", details.distance);
    if let Some(age) = &animal.approximate_age {
        println!("  age:      {age}");
    }
    if let Some(description) = animal.description.as_deref().filter(|d| !d.is_empty()) {
        println!("  about:    {description}");
    }
    match &details.creator {
        Some(creator) => println!("  reported by {}", creator.name),
        None => println!("  reported by user {}", animal.created_by_user_id),
    }
    for url in &details.photo_urls {
        println!("  photo:    {url}");
    }
    if is_owner {
        println!("  (you reported this animal)");
    }
}

fn print_profile(view: &ProfileView) {
    let profile = &view.profile;
    println!("{} <{}>", profile.name, profile.email);
    if let (Some(city), Some(state)) = (&profile.city, &profile.state) {
        println!("  {city} - {state}");
    }
    println!("  type:  {}", profile.user_type);
    if let Some(url) = &view.photo_url {
        println!("  photo: {url}");
    }
}
