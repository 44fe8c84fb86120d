use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serenity::async_trait;
use serenity::client::{Context as SerenityContext, EventHandler};
use serenity::model::application::{Command as AppCommand, CommandInteraction, Interaction};
use serenity::model::gateway::Ready;

use crate::BoxFuture;
use crate::context::{Context, ContextInner};
use crate::error::Error;
use crate::model::Command;

type PreCommandFn<D> = for<'i> fn(Context<'i, D>) -> BoxFuture<'i, ()>;
type OnErrorFn<D> = for<'i> fn(Context<'i, D>, Error) -> BoxFuture<'i, ()>;

/// The command framework itself.
///
/// Register it as the event handler of [serenity's client].
///
/// [serenity's client]: serenity::client::ClientBuilder::event_handler
pub struct Framework<D> {
    data: Arc<D>,
    commands: Vec<Command<D>>,
    pre_command: Option<PreCommandFn<D>>,
    on_error: Option<OnErrorFn<D>>,
    auto_register: AtomicBool,
}

#[async_trait]
impl<D: Send + Sync + 'static> EventHandler for Framework<D> {
    async fn ready(&self, ctx: SerenityContext, ready: Ready) {
        log::info!("{} is online and ready!", ready.user.tag());
        self.register_commands(&ctx).await;
    }

    async fn interaction_create(&self, ctx: SerenityContext, interaction: Interaction) {
        if let Interaction::Command(interaction) = &interaction {
            self.run_command(&ctx, interaction).await;
        }
    }
}

impl<D> Framework<D> {
    /// Constructs a new empty framework around the shared user data.
    ///
    /// At minimum, you should call [`Self::commands`] to register the supported
    /// commands.
    #[must_use]
    pub fn new(data: Arc<D>) -> Self {
        Self {
            data,
            commands: Vec::new(),
            pre_command: None,
            on_error: None,
            auto_register: AtomicBool::new(false),
        }
    }

    /// Registers the list of commands.
    ///
    /// Repeated calls replace the entire list.
    #[must_use]
    pub fn commands<I>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = Command<D>>,
    {
        self.commands = commands.into_iter().collect();
        self
    }

    /// Sets a function to call before every command invocation.
    #[must_use]
    pub fn pre_command(mut self, pre_command: PreCommandFn<D>) -> Self {
        self.pre_command = Some(pre_command);
        self
    }

    /// Sets the error handler function.
    #[must_use]
    pub fn on_error(mut self, on_error: OnErrorFn<D>) -> Self {
        self.on_error = Some(on_error);
        self
    }

    /// Sets the framework to automatically register all commands globally
    /// once the gateway is ready.
    #[must_use]
    pub fn auto_register(mut self) -> Self {
        *self.auto_register.get_mut() = true;
        self
    }

    /// Gets the registered commands.
    pub fn registered(&self) -> &[Command<D>] {
        &self.commands
    }

    async fn handle_error(&self, ctx: Context<'_, D>, why: Error) {
        match self.on_error {
            Some(on_error) => on_error(ctx, why).await,
            None => log::error!("Unhandled command error: {why}"),
        }
    }

    async fn register_commands(&self, ctx: &SerenityContext) {
        // if this was already false, either `auto_register` was not used or we are
        // already registering commands
        if !self.auto_register.swap(false, Ordering::AcqRel) {
            return;
        }

        if let Err(why) = self.register_commands_or(ctx).await {
            // on failure, reset it to true so we might be able to retry on the next ready
            self.auto_register.store(true, Ordering::Release);
            log::error!("Failed to register commands: {why}");
        }
    }

    async fn register_commands_or(&self, ctx: &SerenityContext) -> serenity::Result<()> {
        let commands = crate::to_create_command(&self.commands);
        let commands = AppCommand::set_global_commands(&ctx.http, commands).await?;

        log::info!("Created {} global commands.", commands.len());
        Ok(())
    }

    async fn run_command(&self, serenity: &SerenityContext, interaction: &CommandInteraction) {
        let data = &*self.data;
        let name = interaction.data.name.as_str();

        let Some(command) = self.commands.iter().find(|c| *c.name == *name) else {
            let ctx_inner = ContextInner::empty();
            let ctx = Context::new(serenity, interaction, data, &ctx_inner);
            self.handle_error(ctx, Error::structure_mismatch("unknown command"))
                .await;
            return;
        };

        let ctx_inner = ContextInner::with_options(interaction.data.options());
        let ctx = Context::new(serenity, interaction, data, &ctx_inner);

        if let Some(pre_command) = self.pre_command {
            pre_command(ctx).await;
        }

        if let Err(why) = (command.invoke)(ctx).await {
            self.handle_error(ctx, Error::command(why)).await;
        }
    }
}
