mod api;
mod session;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use colored::*;
use tokio::sync::RwLock;

use api::{ApiClient, Sesion};
use session::{iniciar_renovacion, SesionCompartida};

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🏢 Intranet del Clúster - CLI".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    let base_url =
        std::env::var("INTRANET_API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let api = ApiClient::new(base_url);

    // Paso 1: credenciales y login
    let (email, password) = leer_credenciales()?;
    let inicial = match api.login(&email, &password).await {
        Ok(sesion) => sesion,
        Err(e) => {
            println!("{}", format!("❌ Login fallido: {}", e).bright_red());
            return Ok(());
        }
    };
    println!(
        "{}",
        format!("✅ Bienvenido/a, {}", inicial.usuario.nombre_completo).bright_green()
    );

    let sesion: SesionCompartida = Arc::new(RwLock::new(Some(inicial)));
    let renovacion = iniciar_renovacion(api.clone(), sesion.clone());

    // Paso 2: menú principal
    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 👤 Mi perfil");
        println!("2. 📰 Boletines");
        println!("3. 📅 Próximos eventos");
        println!("4. 🚪 Cerrar sesión y salir");
        print!("{}", "Selecciona una opción (1-4): ".bright_yellow());
        io::stdout().flush()?;

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;

        let Some(actual) = sesion.read().await.clone() else {
            println!("{}", "❌ La sesión expiró. Vuelve a iniciar sesión.".bright_red());
            break;
        };

        match choice.trim() {
            "1" => mostrar_perfil(&api, &actual).await,
            "2" => mostrar_boletines(&api, &actual).await,
            "3" => mostrar_eventos(&api, &actual).await,
            "4" => {
                *sesion.write().await = None;
                match api.logout(&actual).await {
                    Ok(()) => println!("{}", "👋 Sesión cerrada. ¡Hasta luego!".bright_green()),
                    Err(e) => println!("{}", format!("⚠️ Logout: {}", e).bright_yellow()),
                }
                break;
            }
            _ => println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red()),
        }
    }

    renovacion.abort();
    Ok(())
}

fn leer_credenciales() -> Result<(String, String)> {
    println!("{}", "🔐 INICIAR SESIÓN".bright_cyan().bold());
    println!("{}", "=================".bright_cyan());

    print!("{}", "Email: ".bright_yellow());
    io::stdout().flush()?;
    let mut email = String::new();
    io::stdin().read_line(&mut email)?;

    print!("{}", "Password: ".bright_yellow());
    io::stdout().flush()?;
    let mut password = String::new();
    io::stdin().read_line(&mut password)?;

    Ok((email.trim().to_string(), password.trim().to_string()))
}

async fn mostrar_perfil(api: &ApiClient, sesion: &Sesion) {
    match api.me(sesion).await {
        Ok(usuario) => {
            println!("{}", "👤 PERFIL".bright_cyan().bold());
            println!("   #{} {}", usuario.id, usuario.nombre_completo);
            println!("   {}", usuario.email);
            println!("   rol: {} · estado: {}", usuario.rol, usuario.estado_usuario);
            println!("   token válido hasta: {}", sesion.expira_en.format("%H:%M:%S UTC"));
        }
        Err(e) => println!("{}", format!("❌ {}", e).bright_red()),
    }
}

async fn mostrar_boletines(api: &ApiClient, sesion: &Sesion) {
    match api.boletines(sesion).await {
        Ok(lista) => {
            println!(
                "{}",
                format!("📰 BOLETINES ({} en total)", lista.total).bright_cyan().bold()
            );
            if lista.items.is_empty() {
                println!("{}", "⚠️ No hay boletines publicados".bright_yellow());
            }
            for boletin in lista.items {
                let fecha = boletin
                    .fecha_publicacion
                    .map(|f| f.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "   #{} [{}] {} ({} vistas)",
                    boletin.id, fecha, boletin.titulo, boletin.visualizaciones
                );
                if let Some(resumen) = boletin.resumen {
                    println!("      {}", resumen.dimmed());
                }
            }
        }
        Err(e) => println!("{}", format!("❌ {}", e).bright_red()),
    }
}

async fn mostrar_eventos(api: &ApiClient, sesion: &Sesion) {
    match api.eventos(sesion).await {
        Ok(lista) => {
            println!(
                "{}",
                format!("📅 PRÓXIMOS EVENTOS ({} en total)", lista.total).bright_cyan().bold()
            );
            if lista.items.is_empty() {
                println!("{}", "⚠️ No hay eventos programados".bright_yellow());
            }
            for evento in lista.items {
                let plazas = evento
                    .plazas_disponibles
                    .map(|p| format!("{} plazas", p))
                    .unwrap_or_else(|| "sin límite".to_string());
                println!(
                    "   #{} {} · {} · {} · {}",
                    evento.id,
                    evento.fecha_inicio,
                    evento.titulo,
                    evento.ubicacion.as_deref().unwrap_or("-"),
                    plazas
                );
                println!("      estado: {}", evento.estado);
            }
        }
        Err(e) => println!("{}", format!("❌ {}", e).bright_red()),
    }
}
