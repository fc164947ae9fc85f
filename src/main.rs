use anyhow::Context;
use log::{debug, error, info};
use progressive_mandelbrot::{
    config::Config,
    controls::Command,
    display::Display,
    scheduler::RenderState,
    screen,
    surface::Framebuffer,
    ticker::{FrameTicker, FrameTickerHandle},
    Error,
};
use winit::{
    event::{ElementState, Event, KeyboardInput, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_args(std::env::args_os()) {
        Err(Error::Arguments(error)) => error.exit(),
        config => config.context("invalid configuration")?,
    };
    debug!("{:?}", config);

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Mandelbrot")
        .with_inner_size(winit::dpi::PhysicalSize::from(config.size))
        .build(&event_loop)
        .context("failed to create window")?;

    let mut display = Display::new(&window).context("failed to initialise display")?;
    let mut framebuffer = Framebuffer::new(display.size());

    let ticker = FrameTicker::new();
    let mut render_state: RenderState<FrameTickerHandle> = RenderState::new();
    // The view the next render request captures.
    let mut pending_view = config.view;
    render_state.request_render(pending_view, || ticker.start());

    event_loop.run(move |event, _, control_flow| {
        match event {
            Event::MainEventsCleared => {
                if ticker.is_active() {
                    ticker.run_frame(&mut render_state, &mut framebuffer, config.frame_budget);
                    window.request_redraw();
                    control_flow.set_poll();
                } else {
                    control_flow.set_wait();
                }
            }
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    if !display.resize(screen::Size::from(size)) {
                        return;
                    }
                    let size = display.size();
                    info!("resized to {}x{}", size.width, size.height);
                    render_state.cancel();
                    framebuffer.resize(size);
                    // Unconfirmed keyboard edits stay pending.
                    let view = render_state.last_view().unwrap_or(pending_view);
                    render_state.request_render(view, || ticker.start());
                    window.request_redraw();
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => match Command::from_key(key) {
                    Some(Command::Render) => {
                        render_state.request_render(pending_view, || ticker.start());
                    }
                    Some(Command::Cancel) => {
                        render_state.cancel();
                    }
                    Some(command) => {
                        if let Some(view) = command.edit(pending_view) {
                            debug!("{:?}: pending view {:?}", command, view);
                            pending_view = view;
                        }
                    }
                    None => {}
                },
                _ => {}
            },
            Event::RedrawRequested(window_id) if window_id == window.id() => {
                display.upload(&mut framebuffer);
                if let Err(error) = display.present() {
                    error!("failed to present frame: {}", error);
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    });
}
